//! # rfms-core: Pure Business Logic for RFMS Bridge
//!
//! This crate is the **heart** of RFMS Bridge. It contains all the
//! reconciliation and matching logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RFMS Bridge Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Document Intake (external collaborators)           │   │
//! │  │     PDF/email extraction ──► structured records ──► bridge      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ★ rfms-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────────┐  │   │
//! │  │   │identifier │ │  matcher  │ │ reconcile │ │    payable    │  │   │
//! │  │   │ Canonical │ │ decision  │ │ receipt↔  │ │  GST decomp   │  │   │
//! │  │   │ {p,b,s}   │ │ procedure │ │ invoice   │ │  AP posting   │  │   │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS • DETERMINISTIC          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 rfms-gateway (Network Edge)                     │   │
//! │  │       Session, HTTP client, matcher workflow, billing links     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`identifier`] - Canonical order/PO number normalization
//! - [`matcher`] - The pure match-or-create-or-link decision procedure
//! - [`reconcile`] - Stock receipt ↔ supplier invoice matching
//! - [`payable`] - GST decomposition and AP posting construction
//! - [`money`] - Money type with integer-cent arithmetic (no floats!)
//! - [`types`] - Domain types (DocumentRecord, StockReceipt, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Payload validation before any remote call
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same identifier + candidate list = same decision
//! 2. **No I/O**: network and file system access is FORBIDDEN here
//! 3. **Integer Money**: AP postings balance to the cent, so all monetary
//!    values are cents (i64)
//! 4. **Outcomes over exceptions**: no-match and tolerance overrides are
//!    values callers branch on, not errors

pub mod error;
pub mod identifier;
pub mod matcher;
pub mod money;
pub mod payable;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use identifier::CanonicalIdentifier;
pub use matcher::MatchDecision;
pub use money::Money;
pub use types::*;
