//! # Billing Group Linker
//!
//! Places a newly created sibling order under its parent's billing group,
//! creating the group first when the parent is still ungrouped.
//!
//! ## Link Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   parent grouped already?                                               │
//! │        │                                                                │
//! │   no ──┼──► POST /order { number: parent, billingGroup: {description} } │
//! │        │                         │                                      │
//! │        │                     failure ──► GatewayError (nothing linked)  │
//! │        ▼                                                                │
//! │   POST /order { number: child, billingGroup: {parentOrder: parent} }    │
//! │                                  │                                      │
//! │                              failure ──► PartialLink                    │
//! │                                                                         │
//! │   The two steps are NOT atomic. A failure after the group was created  │
//! │   leaves the parent grouped and the child orphaned - that is the       │
//! │   PartialLink variant, distinct from plain transport failure, so the   │
//! │   caller can report exactly which manual step remains.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use rfms_core::DocumentRecord;

use crate::client::RemoteGateway;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{BillingGroupUpdate, WireBillingGroup};

/// The remote steps required to place a child under its parent's group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPlan {
    /// Parent is ungrouped: create the group on the parent first, then link.
    CreateGroupThenLink { description: String },

    /// Parent already owns a group: the child link is the only step.
    LinkOnly,
}

/// Decides the link sequence from the parent's current grouping state.
pub fn plan(parent: &DocumentRecord) -> LinkPlan {
    if parent.is_grouped() {
        LinkPlan::LinkOnly
    } else {
        LinkPlan::CreateGroupThenLink {
            description: format!("{} billing group", parent.po_number),
        }
    }
}

/// Links `child` under `parent`'s billing group, creating the group first
/// when the parent is ungrouped.
///
/// A failure on the child-link step after the group was created surfaces as
/// [`GatewayError::PartialLink`]; a failure on the group-create step leaves
/// nothing changed and surfaces as the underlying error.
pub async fn link_under_parent(
    gateway: &RemoteGateway,
    parent: &DocumentRecord,
    child: &DocumentRecord,
) -> GatewayResult<()> {
    let sequence = plan(parent);
    let mut group_created = false;

    if let LinkPlan::CreateGroupThenLink { description } = &sequence {
        let update = BillingGroupUpdate {
            number: &parent.document_number,
            billing_group: WireBillingGroup {
                parent_order: None,
                description: Some(description),
            },
        };
        gateway.update_billing_group(&update).await?;
        group_created = true;
        info!(parent = %parent.document_number, "billing group created");
    }

    let update = BillingGroupUpdate {
        number: &child.document_number,
        billing_group: WireBillingGroup {
            parent_order: Some(&parent.document_number),
            description: None,
        },
    };
    if let Err(source) = gateway.update_billing_group(&update).await {
        if !group_created {
            return Err(source);
        }
        warn!(
            parent = %parent.document_number,
            child = %child.document_number,
            error = %source,
            "group created but child link failed"
        );
        return Err(GatewayError::PartialLink {
            parent: parent.document_number.clone(),
            child: child.document_number.clone(),
            reason: source.to_string(),
        });
    }

    info!(parent = %parent.document_number, child = %child.document_number, "child linked");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
