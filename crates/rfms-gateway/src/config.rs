//! # Gateway Configuration
//!
//! Configuration management for the RFMS gateway.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RFMS_BASE_URL, RFMS_STORE_CODE, RFMS_API_KEY                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/rfms-bridge/gateway.toml (Linux)                         │
//! │     ~/Library/Application Support/com.rfms.bridge/gateway.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     timeouts only - credentials have no defaults                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # gateway.toml
//! [api]
//! base_url = "https://api.rfms.example/v2"
//! store_code = "store-042"
//! api_key = "k-..."
//!
//! [http]
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

// =============================================================================
// API Configuration
// =============================================================================

/// Remote API endpoint and credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the RFMS API.
    pub base_url: String,

    /// Store code; the basic-auth username on every call.
    pub store_code: String,

    /// API key exchanged for a session token at /session/begin.
    pub api_key: String,
}

// =============================================================================
// HTTP Settings
// =============================================================================

/// HTTP client settings. No retry settings live here: the only retry this
/// core performs is the bounded single re-auth, which is not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connection timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Per-request timeout (seconds). Callers needing tighter deadlines
    /// impose their own.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// =============================================================================
// Gateway Configuration
// =============================================================================

/// Full gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub api: ApiConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl GatewayConfig {
    /// Loads configuration from the default path, then applies env-var
    /// overrides.
    pub fn load() -> GatewayResult<Self> {
        let path = Self::default_path()
            .ok_or_else(|| GatewayError::ConfigLoadFailed("no home directory".to_string()))?;
        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path, then applies env-var
    /// overrides.
    pub fn load_from(path: &Path) -> GatewayResult<Self> {
        debug!(path = %path.display(), "loading gateway config");
        let raw = std::fs::read_to_string(path)?;
        let mut config: GatewayConfig = toml::from_str(&raw)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string (no env overrides).
    pub fn from_toml(raw: &str) -> GatewayResult<Self> {
        let config: GatewayConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The platform config file location.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rfms", "bridge")
            .map(|dirs| dirs.config_dir().join("gateway.toml"))
    }

    /// Applies environment-variable overrides (highest priority).
    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("RFMS_BASE_URL") {
            self.api.base_url = value;
        }
        if let Ok(value) = std::env::var("RFMS_STORE_CODE") {
            self.api.store_code = value;
        }
        if let Ok(value) = std::env::var("RFMS_API_KEY") {
            self.api.api_key = value;
        }
    }

    /// Rejects configurations that cannot possibly authenticate.
    fn validate(&self) -> GatewayResult<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(GatewayError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.store_code.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "store_code is required".to_string(),
            ));
        }
        if self.api.api_key.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "api_key is required".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
