//! # Gateway Error Types
//!
//! Error types for remote gateway operations.
//!
//! ## Error Taxonomy (organized by what callers must do with them)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Gateway Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Authentication │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Auth (retry    │  │  Transport      │  │  Decode                 │ │
//! │  │  exhausted,     │  │  (network -     │  │  (remote payload did    │ │
//! │  │  fatal)         │  │  NOT retried    │  │  not match any known    │ │
//! │  │                 │  │  by this core)  │  │  shape)                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Remote status  │  │  Partial link   │  │   Configuration         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Http {status,  │  │  PartialLink    │  │   InvalidConfig         │ │
//! │  │  body}          │  │  (remote state  │  │   ConfigLoadFailed      │ │
//! │  │                 │  │  has diverged!) │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No-match is never an error (it is an outcome variant in rfms-core), and
//! a tolerance breach on an AP total is resolved, not raised.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway error type covering all remote-call failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    /// The single re-authentication retry is exhausted. Fatal; the caller
    /// sees this only after two consecutive auth failures.
    #[error("Authentication failed after retry: {0}")]
    Auth(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network/timeout failure. Not retried by this core; deadlines and
    /// retries beyond the auth contract are the caller's responsibility.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote API answered with a non-success status.
    #[error("Remote API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The response body did not decode into the expected shape.
    #[error("Failed to decode remote response: {0}")]
    Decode(String),

    // =========================================================================
    // Billing Group Errors
    // =========================================================================
    /// The billing group was created but linking the child failed. Remote
    /// state has already diverged; distinct from total failure so callers
    /// can reconcile the orphaned child.
    #[error("Billing group created for {parent} but linking child {child} failed: {reason}")]
    PartialLink {
        parent: String,
        child: String,
        reason: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid gateway configuration.
    #[error("Invalid gateway configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A core business rule rejected the operation before any remote call.
    #[error(transparent)]
    Core(#[from] rfms_core::CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(err: toml::de::Error) -> Self {
        GatewayError::ConfigLoadFailed(err.to_string())
    }
}

impl From<rfms_core::ValidationError> for GatewayError {
    fn from(err: rfms_core::ValidationError) -> Self {
        GatewayError::Core(err.into())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl GatewayError {
    /// True when the failure is an exhausted authentication retry.
    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Auth(_))
    }

    /// True when remote state has already diverged (the parent is grouped
    /// but the child is orphaned). These must never be handled as plain
    /// transport failures.
    pub fn is_partial(&self) -> bool {
        matches!(self, GatewayError::PartialLink { .. })
    }

    /// True when a retry by the CALLER could plausibly succeed (network
    /// trouble). Auth exhaustion and config errors are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorization() {
        assert!(GatewayError::Auth("expired".into()).is_auth());
        assert!(GatewayError::Transport("connection reset".into()).is_retryable());
        assert!(!GatewayError::Auth("expired".into()).is_retryable());

        let partial = GatewayError::PartialLink {
            parent: "AZ0030".into(),
            child: "AZ0031".into(),
            reason: "timeout".into(),
        };
        assert!(partial.is_partial());
        assert!(!partial.is_retryable());
    }

    #[test]
    fn test_partial_link_message_names_both_documents() {
        let partial = GatewayError::PartialLink {
            parent: "AZ0030".into(),
            child: "AZ0031".into(),
            reason: "timeout".into(),
        };
        let msg = partial.to_string();
        assert!(msg.contains("AZ0030"));
        assert!(msg.contains("AZ0031"));
    }
}
