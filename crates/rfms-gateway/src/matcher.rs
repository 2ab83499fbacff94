//! # Reconciliation Workflow
//!
//! The I/O half of the DocumentMatcher: gathers candidates from the remote
//! search, feeds them to the pure decision procedure, and executes the
//! decided side effects (create, link).
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   normalize(po) ──► variations (+ parent variations when a sub-        │
//! │                     document suffix is present) ──► /order/find each   │
//! │                                         │                               │
//! │                              dedupe by documentNumber                   │
//! │                                         │                               │
//! │                                    decide(...)                          │
//! │                      ┌──────────────────┼──────────────────┐            │
//! │                      ▼                  ▼                  ▼            │
//! │                  Existing       CreateUnderParent        Create         │
//! │                      │                  │                  │            │
//! │                      │           create + link          create          │
//! │                      ▼                  ▼                  ▼            │
//! │              ExistingOrder/     BillingGroupAdded    NewOrder/          │
//! │              ExistingQuote                           NewQuote           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every terminal state is a [`ReconciliationOutcome`] variant; only
//! transport, auth and partial-link failures surface as errors.

use std::collections::HashSet;

use tracing::{debug, info};

use rfms_core::{
    matcher::decide, CanonicalIdentifier, DocumentKind, DocumentRecord, MatchDecision,
    NewDocumentPayload, ReconciliationOutcome,
};

use crate::billing;
use crate::client::RemoteGateway;
use crate::error::GatewayResult;

/// The full set of spellings queried for one identifier: its own
/// variations plus, for suffixed identifiers, the parent's. The remote
/// store may index only one exact spelling per record, so a parent stored
/// as "AZ003463" is found by no child spelling - the parent must be
/// queried under its own spellings or the billing-group branch can never
/// fire.
pub fn search_spellings(id: &CanonicalIdentifier) -> Vec<String> {
    let mut spellings = id.variations();
    if let Some(parent) = id.parent() {
        for spelling in parent.variations() {
            if !spellings.contains(&spelling) {
                spellings.push(spelling);
            }
        }
    }
    spellings
}

/// Searches every spelling of the identifier (and of its parent, when one
/// exists) and merges the result sets, deduplicated on document number.
/// Spelling order is preserved so the decision procedure stays
/// deterministic for a given identifier.
pub async fn gather_candidates(
    gateway: &RemoteGateway,
    id: &CanonicalIdentifier,
) -> GatewayResult<Vec<DocumentRecord>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();
    for variation in search_spellings(id) {
        for record in gateway.find(&variation).await? {
            if seen.insert(record.document_number.clone()) {
                candidates.push(record);
            }
        }
    }
    debug!(po = %id.full, count = candidates.len(), "candidates gathered");
    Ok(candidates)
}

/// Runs the full match-or-create-or-link workflow for one inbound document.
///
/// The payload's `po_number` is normalized, candidates are gathered, and
/// the decision procedure's side effects execute in order. The create-
/// under-parent path propagates a failed child link as
/// [`crate::error::GatewayError::PartialLink`] so the caller can report the
/// remaining manual step.
pub async fn reconcile(
    gateway: &RemoteGateway,
    kind: DocumentKind,
    payload: &NewDocumentPayload,
) -> GatewayResult<ReconciliationOutcome> {
    let id = CanonicalIdentifier::normalize(&payload.po_number);
    let candidates = gather_candidates(gateway, &id).await?;

    let outcome = match decide(&id, kind, &candidates) {
        MatchDecision::Existing(record) => match kind {
            DocumentKind::Order => ReconciliationOutcome::ExistingOrder { record },
            DocumentKind::Quote => ReconciliationOutcome::ExistingQuote { record },
        },
        MatchDecision::CreateUnderParent(parent) => {
            let record = gateway.create(kind, payload).await?;
            billing::link_under_parent(gateway, &parent, &record).await?;
            ReconciliationOutcome::BillingGroupAdded { record, parent }
        }
        MatchDecision::Create => {
            let record = gateway.create(kind, payload).await?;
            match kind {
                DocumentKind::Order => ReconciliationOutcome::NewOrder { record },
                DocumentKind::Quote => ReconciliationOutcome::NewQuote { record },
            }
        }
    };

    info!(
        po = %id.full,
        kind = kind.as_str(),
        document = %outcome.record().document_number,
        created = outcome.created(),
        "reconciliation complete"
    );
    Ok(outcome)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(document_number: &str, po_number: &str) -> DocumentRecord {
        DocumentRecord {
            document_number: document_number.to_string(),
            po_number: po_number.to_string(),
            billing_group_id: 0,
            doc_id: None,
            customer_name: None,
        }
    }

    #[test]
    fn test_search_spellings_include_parent() {
        let id = CanonicalIdentifier::normalize("AZ003463-0001");
        let spellings = search_spellings(&id);
        // the child's own spellings first, then the parent's full spelling
        // (its base "003463" is already covered)
        assert_eq!(
            spellings,
            vec!["AZ003463-0001", "AZ0034630001", "003463", "AZ003463"]
        );
    }

    #[test]
    fn test_search_spellings_without_suffix() {
        // no suffix means no parent; nothing extra is queried
        let id = CanonicalIdentifier::normalize("AZ003463");
        assert_eq!(search_spellings(&id), vec!["AZ003463", "003463"]);

        let miss = CanonicalIdentifier::normalize("P1BW-1828");
        assert_eq!(search_spellings(&miss), vec!["P1BW-1828"]);
    }

    #[test]
    fn test_parent_found_under_its_own_spelling_only() {
        // a remote store that indexes poNumber spellings exactly, holding
        // only the parent: no child spelling returns it, the parent
        // spelling must be queried for the billing-group branch to fire
        let mut store: HashMap<&str, Vec<DocumentRecord>> = HashMap::new();
        store.insert("AZ003463", vec![record("AZ0030", "AZ003463")]);

        let id = CanonicalIdentifier::normalize("AZ003463-0001");
        let mut candidates = Vec::new();
        for spelling in search_spellings(&id) {
            if let Some(records) = store.get(spelling.as_str()) {
                candidates.extend(records.iter().cloned());
            }
        }

        assert_eq!(candidates.len(), 1);
        let decision = decide(&id, DocumentKind::Order, &candidates);
        assert!(
            matches!(decision, MatchDecision::CreateUnderParent(r) if r.document_number == "AZ0030")
        );
    }
}
