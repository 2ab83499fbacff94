//! # Match Decision Procedure
//!
//! The pure half of the DocumentMatcher: given a canonical identifier and
//! the candidate records returned by remote search, decide whether the
//! inbound document matches an existing record, should be created under a
//! billing-group parent, or should be created standalone.
//!
//! ## Decision Order (load-bearing)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. EXACT   candidate poNumber names the same document      → Existing  │
//! │  2. PREFIX  (orders only, suffixed ids only)                            │
//! │             candidate poNumber reduces to the parent's                  │
//! │             prefix+base                                     → UnderParent│
//! │  3. NONE                                                    → Create    │
//! │                                                                         │
//! │  Exact ALWAYS beats prefix: prefix matching is only attempted when no   │
//! │  exact match exists. Returning a prefix match in the presence of an     │
//! │  exact one would attach a new line item to the wrong sibling document.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The procedure is deterministic: the same identifier and candidate list
//! always produce the same decision (first match in list order wins within
//! a rule). Remote I/O - searching, creating, linking - lives in the
//! gateway crate.

use tracing::debug;

use crate::identifier::CanonicalIdentifier;
use crate::types::{DocumentKind, DocumentRecord};

/// The outcome of the pure decision procedure.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision {
    /// A candidate's poNumber names the same document.
    Existing(DocumentRecord),

    /// No exact match, but a candidate shares the identifier's
    /// prefix+base: create the document, then link it under this parent's
    /// billing group. Orders only.
    CreateUnderParent(DocumentRecord),

    /// No match found - a valid outcome, not an error. Create standalone.
    Create,
}

/// Runs the match-or-create-or-link decision over a candidate list.
///
/// Candidates are compared on their `po_number` (the match key), by
/// canonical equality so separator style never matters. Quotes skip the
/// parent-prefix rule entirely.
pub fn decide(
    id: &CanonicalIdentifier,
    kind: DocumentKind,
    candidates: &[DocumentRecord],
) -> MatchDecision {
    // Rule 1: exact match on the full identifier.
    for candidate in candidates {
        let candidate_id = CanonicalIdentifier::normalize(&candidate.po_number);
        if candidate_id.same_document(id) {
            debug!(
                document = %candidate.document_number,
                po = %candidate.po_number,
                "exact match"
            );
            return MatchDecision::Existing(candidate.clone());
        }
    }

    // Rule 2: parent-prefix match, orders with a sub-document suffix only.
    if kind == DocumentKind::Order && id.suffix.is_some() {
        for candidate in candidates {
            let candidate_id = CanonicalIdentifier::normalize(&candidate.po_number);
            if candidate_id.same_root(id) {
                debug!(
                    document = %candidate.document_number,
                    po = %candidate.po_number,
                    "prefix match, will link under parent"
                );
                return MatchDecision::CreateUnderParent(candidate.clone());
            }
        }
    }

    MatchDecision::Create
}

// =============================================================================
// Unit Tests
// =============================================================================
