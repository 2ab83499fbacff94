//! # rfms-gateway: Session-Managed RFMS API Client
//!
//! This crate provides the network edge of the RFMS bridge: session
//! lifecycle, the typed HTTP client, and the I/O halves of the
//! reconciliation workflows. All pure business rules live in `rfms-core`;
//! nothing in that crate touches the network.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Gateway Architecture                            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     RemoteGateway (client)                       │  │
//! │  │                                                                  │  │
//! │  │  Typed operations: find / create / attach / billing group /      │  │
//! │  │  payables / passthrough                                          │  │
//! │  │  Every call runs under the bounded auth-retry contract           │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ SessionManager │  │   protocol     │  │  dates                 │    │
//! │  │                │  │                │  │                        │    │
//! │  │ 55-min assumed │  │ Wire shapes,   │  │ Boundary formatting:   │    │
//! │  │ TTL, cached    │  │ camelCase +    │  │ search MM-DD-YYYY,     │    │
//! │  │ token, single  │  │ key-ambiguity  │  │ payables M/D/YY,       │    │
//! │  │ re-auth retry  │  │ aliases        │  │ internal ISO           │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────────────────────────────────┐    │
//! │  │  matcher       │  │  billing                                   │    │
//! │  │                │  │                                            │    │
//! │  │ gather + decide│  │ create-group-then-link sequence with a     │    │
//! │  │ + create/link  │  │ distinct partial-failure error             │    │
//! │  │ workflow       │  │                                            │    │
//! │  └────────────────┘  └────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`billing`] - Billing-group create/link sequence
//! - [`client`] - `RemoteGateway`, the typed HTTP client
//! - [`config`] - TOML + environment configuration
//! - [`dates`] - Boundary date formatting
//! - [`error`] - Gateway error types
//! - [`matcher`] - Match-or-create-or-link workflow
//! - [`protocol`] - Wire request/response shapes
//! - [`session`] - Session lifecycle and the bounded auth retry

pub mod billing;
pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod matcher;
pub mod protocol;
pub mod session;

pub use client::RemoteGateway;
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use matcher::reconcile;
pub use session::{SessionManager, SESSION_TTL};
