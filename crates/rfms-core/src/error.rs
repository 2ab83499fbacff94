//! # Error Types
//!
//! Domain-specific error types for rfms-core.
//!
//! ## What is NOT an error here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Modeled as OUTCOMES, not errors (callers branch on them):              │
//! │                                                                         │
//! │  • Normalization miss  → degraded CanonicalIdentifier + warn log        │
//! │  • No match found      → MatchDecision::Create / Option::None           │
//! │  • Tolerance exceeded  → invoice total preferred + warn log             │
//! │                                                                         │
//! │  Only genuine rule violations surface as CoreError.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (invoice number, field name)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An AP posting ended up with zero detail lines - invalid input,
    /// nothing to post.
    #[error("AP posting for invoice {invoice_number} has no detail lines")]
    EmptyPosting { invoice_number: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any remote call is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Field value does not match the expected format.
    #[error("{field} has an invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::EmptyPosting {
            invoice_number: "SI-4471".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "AP posting for invoice SI-4471 has no detail lines"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "po_number".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
