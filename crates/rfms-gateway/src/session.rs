//! # Session Manager
//!
//! Owns the one mutable authenticated-session credential for the RFMS API,
//! its assumed expiry, and the bounded retry-on-auth-failure state machine.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Lifecycle                                │
//! │                                                                         │
//! │  ┌────────────────┐      ┌──────────────────┐                          │
//! │  │  rfms-gateway  │      │  RFMS API        │                          │
//! │  └───────┬────────┘      └────────┬─────────┘                          │
//! │          │  1. POST /session/begin│                                     │
//! │          │   basic(store, apiKey) │                                     │
//! │          │───────────────────────►│                                     │
//! │          │  2. { sessionToken }   │                                     │
//! │          │◄───────────────────────│                                     │
//! │          │                        │                                     │
//! │          │  3. every call: basic(store, sessionToken)                   │
//! │          │                        │                                     │
//! │          │  [401/403 at any point] → invalidate, ONE re-auth,           │
//! │          │                           ONE retry, then fatal              │
//! │          │                        │                                     │
//! │  Expiry: assumed 55 minutes from issuance - conservative against an    │
//! │  unconfirmed 60-minute server-side limit (the API advertises no TTL).  │
//! │  Never persisted across process restarts.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cached credential is process-wide mutable shared state. Read-or-
//! refresh is serialized behind a `tokio::sync::Mutex` so two concurrent
//! callers never race into a double re-authentication or interleave a
//! stale token into a request issued just after a refresh.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::BeginSessionResponse;

/// Assumed session lifetime. The remote API does not advertise a TTL;
/// 55 minutes is conservative against the unconfirmed 60-minute limit.
pub const SESSION_TTL: Duration = Duration::from_secs(55 * 60);

// =============================================================================
// Remote Session
// =============================================================================

/// An authenticated session credential with its assumed expiry.
#[derive(Debug, Clone)]
pub struct RemoteSession {
    /// Opaque session token; the basic-auth password on subsequent calls.
    pub token: String,
    /// When the assumed TTL runs out (local monotonic time).
    pub expires_at: Instant,
}

impl RemoteSession {
    fn issued_now(token: String) -> Self {
        RemoteSession {
            token,
            expires_at: Instant::now() + SESSION_TTL,
        }
    }

    /// True once the assumed TTL has elapsed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

// =============================================================================
// Bounded Retry State Machine
// =============================================================================

/// The single-retry-on-auth-failure contract, modeled as an explicit state
/// machine rather than a loop condition:
///
/// ```text
/// Attempt 1 ──on 401/403──► Reauth + Attempt 2 ──on 401/403──► Fail
/// ```
///
/// Every gateway operation forces AT MOST one re-authentication and one
/// retry of the original call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRetry {
    /// First attempt with whatever credential is cached.
    FirstAttempt,
    /// One 401/403 seen; re-authenticated, retrying the original call once.
    Retrying,
    /// Second consecutive auth failure - fatal.
    Exhausted,
}

impl AuthRetry {
    pub fn new() -> Self {
        AuthRetry::FirstAttempt
    }

    /// Advances the machine after an unauthorized response.
    pub fn on_unauthorized(self) -> Self {
        match self {
            AuthRetry::FirstAttempt => AuthRetry::Retrying,
            AuthRetry::Retrying | AuthRetry::Exhausted => AuthRetry::Exhausted,
        }
    }

    /// True while another attempt of the original call is permitted.
    pub fn may_retry(&self) -> bool {
        matches!(self, AuthRetry::FirstAttempt | AuthRetry::Retrying)
    }
}

impl Default for AuthRetry {
    fn default() -> Self {
        AuthRetry::new()
    }
}

// =============================================================================
// Session Manager
// =============================================================================

/// Manages the cached session credential against the RFMS API.
pub struct SessionManager {
    http: reqwest::Client,
    api: ApiConfig,
    session: Mutex<Option<RemoteSession>>,
}

impl SessionManager {
    pub fn new(http: reqwest::Client, api: ApiConfig) -> Self {
        SessionManager {
            http,
            api,
            session: Mutex::new(None),
        }
    }

    /// The store code used as the basic-auth username on every call.
    pub fn store_code(&self) -> &str {
        &self.api.store_code
    }

    /// Returns a valid session token, authenticating if none is cached or
    /// the cached one has passed its assumed expiry.
    ///
    /// The lock is held across the auth round-trip: concurrent callers
    /// queue here instead of each re-authenticating.
    pub async fn ensure(&self) -> GatewayResult<String> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            if !session.is_expired() {
                return Ok(session.token.clone());
            }
            debug!("cached session past assumed expiry, re-authenticating");
        }

        let session = self.authenticate().await?;
        let token = session.token.clone();
        *guard = Some(session);
        Ok(token)
    }

    /// Clears the cached credential. Called on any 401/403 response before
    /// the single retry.
    pub async fn invalidate(&self) {
        let mut guard = self.session.lock().await;
        if guard.take().is_some() {
            warn!("session invalidated after unauthorized response");
        }
    }

    /// True if a non-expired credential is currently cached.
    pub async fn is_authenticated(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| !s.is_expired())
    }

    /// Exchanges store code + API key for a session token.
    async fn authenticate(&self) -> GatewayResult<RemoteSession> {
        let url = format!("{}/session/begin", self.api.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api.store_code, Some(&self.api.api_key))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(GatewayError::Auth(format!(
                "session begin rejected with HTTP {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let begun: BeginSessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        info!(store = %self.api.store_code, "session established");
        Ok(RemoteSession::issued_now(begun.session_token))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = RemoteSession::issued_now("tok".to_string());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_session_detected() {
        let session = RemoteSession {
            token: "tok".to_string(),
            expires_at: Instant::now() - Duration::from_secs(1),
        };
        assert!(session.is_expired());
    }

    #[test]
    fn test_retry_allows_exactly_one_reauth() {
        // a 401 on a call forces exactly one re-auth and one retry;
        // a 401 on the retried call itself is fatal with no further retry
        let state = AuthRetry::new();
        assert!(state.may_retry());

        let state = state.on_unauthorized();
        assert_eq!(state, AuthRetry::Retrying);
        assert!(state.may_retry());

        let state = state.on_unauthorized();
        assert_eq!(state, AuthRetry::Exhausted);
        assert!(!state.may_retry());

        // the machine never leaves Exhausted
        assert_eq!(state.on_unauthorized(), AuthRetry::Exhausted);
    }
}
