//! # Wire Protocol Types
//!
//! Typed request/response shapes for the RFMS API, with the remote
//! response-key ambiguity resolved once at the decode step.
//!
//! ## The Key Ambiguity Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The remote API places the same logical payload under different keys   │
//! │  across endpoints - observed in the wild:                               │
//! │                                                                         │
//! │    /order/find    → { "status": "ok", "detail": [ ... ] }               │
//! │    some builds    → { "status": "ok", "result": [ ... ] }               │
//! │    passthrough    → { "status": "ok", "data":   { ... } }               │
//! │                                                                         │
//! │  This is resolved HERE, with serde aliases, and never leaks into the    │
//! │  matching/reconciliation logic.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All remote field names are camelCase; everything is renamed at this
//! boundary so the rest of the workspace stays snake_case.

use serde::{Deserialize, Serialize};

use rfms_core::{Contact, DocumentRecord};

use crate::error::{GatewayError, GatewayResult};

// =============================================================================
// Session
// =============================================================================

/// Response of `POST /session/begin`.
#[derive(Debug, Deserialize)]
pub struct BeginSessionResponse {
    #[serde(rename = "sessionToken", alias = "token")]
    pub session_token: String,
}

// =============================================================================
// Find
// =============================================================================

/// Request body of `POST /order/find`.
#[derive(Debug, Serialize)]
pub struct FindRequest<'a> {
    #[serde(rename = "searchText")]
    pub search_text: &'a str,
}

/// A document as the remote API spells it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireDocument {
    #[serde(rename = "documentNumber", alias = "number")]
    pub document_number: String,

    #[serde(rename = "poNumber", default)]
    pub po_number: String,

    #[serde(rename = "billingGroupId", default)]
    pub billing_group_id: i64,

    #[serde(rename = "docId", default)]
    pub doc_id: Option<i64>,

    #[serde(rename = "soldToName", alias = "customerName", default)]
    pub customer_name: Option<String>,
}

impl From<WireDocument> for DocumentRecord {
    fn from(wire: WireDocument) -> Self {
        DocumentRecord {
            document_number: wire.document_number,
            po_number: wire.po_number,
            billing_group_id: wire.billing_group_id,
            doc_id: wire.doc_id,
            customer_name: wire.customer_name,
        }
    }
}

/// Response of `POST /order/find`. The record list arrives under `detail`,
/// `result` or `data` depending on the endpoint build; a missing key means
/// an empty result set, not an error.
#[derive(Debug, Deserialize)]
pub struct FindResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(rename = "detail", alias = "result", alias = "data", default)]
    records: Option<Vec<WireDocument>>,
}

impl FindResponse {
    /// The found documents, mapped to owned domain records.
    pub fn into_records(self) -> Vec<DocumentRecord> {
        self.records
            .unwrap_or_default()
            .into_iter()
            .map(DocumentRecord::from)
            .collect()
    }
}

// =============================================================================
// Create
// =============================================================================

/// Sold-to block on a create payload.
#[derive(Debug, Serialize)]
pub struct WireContact<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
    #[serde(rename = "postalCode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<&'a str>,
}

impl<'a> From<&'a Contact> for WireContact<'a> {
    fn from(contact: &'a Contact) -> Self {
        WireContact {
            name: &contact.name,
            phone: contact.phone.as_deref(),
            email: contact.email.as_deref(),
            address: contact.address.as_deref(),
            city: contact.city.as_deref(),
            postal_code: contact.postal_code.as_deref(),
        }
    }
}

/// Request body of `POST /order/create` and `POST /quote/create`.
#[derive(Debug, Serialize)]
pub struct CreateRequest<'a> {
    #[serde(rename = "poNumber")]
    pub po_number: &'a str,

    #[serde(rename = "soldTo")]
    pub sold_to: WireContact<'a>,

    /// Decimal-dollar string, e.g. "1250.00".
    #[serde(rename = "estimateTotal")]
    pub estimate_total: String,

    #[serde(rename = "contractType")]
    pub contract_type: &'a str,

    #[serde(rename = "adSource")]
    pub ad_source: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Inner detail block of a create response.
#[derive(Debug, Deserialize)]
pub struct CreateDetail {
    #[serde(rename = "docId", default)]
    pub doc_id: Option<i64>,
}

/// Response of the create endpoints: the new document number arrives under
/// `result`, the internal id under `detail.docId`.
#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub detail: Option<CreateDetail>,
}

impl CreateResponse {
    /// Maps the response to a domain record for the document just created.
    /// A create response without a document number is a decode failure.
    pub fn into_record(self, po_number: &str) -> GatewayResult<DocumentRecord> {
        let document_number = self.result.ok_or_else(|| {
            GatewayError::Decode("create response carried no document number".to_string())
        })?;
        Ok(DocumentRecord {
            document_number,
            po_number: po_number.to_string(),
            billing_group_id: 0,
            doc_id: self.detail.and_then(|d| d.doc_id),
            customer_name: None,
        })
    }
}

// =============================================================================
// Billing Group
// =============================================================================

/// The billing-group block on `POST /order`. Exactly one of the fields is
/// set per call: `description` creates a group owned by the target order,
/// `parent_order` links the target order under an existing parent.
#[derive(Debug, Serialize)]
pub struct WireBillingGroup<'a> {
    #[serde(rename = "parentOrder", skip_serializing_if = "Option::is_none")]
    pub parent_order: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// Request body of `POST /order` when updating billing-group membership.
#[derive(Debug, Serialize)]
pub struct BillingGroupUpdate<'a> {
    pub number: &'a str,

    #[serde(rename = "billingGroup")]
    pub billing_group: WireBillingGroup<'a>,
}

// =============================================================================
// Attachment
// =============================================================================

/// Request body of `POST /attachment`. `file_data` is base64.
#[derive(Debug, Serialize)]
pub struct AttachmentRequest<'a> {
    #[serde(rename = "documentNumber")]
    pub document_number: &'a str,

    #[serde(rename = "documentType")]
    pub document_type: &'a str,

    #[serde(rename = "fileExtension")]
    pub file_extension: &'a str,

    pub description: &'a str,

    #[serde(rename = "fileData")]
    pub file_data: String,
}

// =============================================================================
// Passthrough
// =============================================================================

/// Request body of `POST /passthrough` - generic RPC for operations
/// lacking a dedicated REST verb (e.g. `Inventory.ReceiveFromInvoice`).
#[derive(Debug, Serialize)]
pub struct PassthroughRequest<'a> {
    #[serde(rename = "methodName")]
    pub method_name: &'a str,

    #[serde(rename = "requestPayload")]
    pub request_payload: serde_json::Value,
}

/// One receipt line on the inventory passthrough payload.
#[derive(Debug, Serialize)]
pub struct WireReceiptLine<'a> {
    #[serde(rename = "lineNumber")]
    pub line_number: u32,

    #[serde(rename = "productCode")]
    pub product_code: &'a str,

    pub quantity: i64,

    /// Decimal-dollar string, ex-GST.
    #[serde(rename = "unitCost")]
    pub unit_cost: String,
}

/// Payload of the `Inventory.ReceiveFromInvoice` passthrough. The order
/// date is already in the remote `MM-DD-YYYY` format; an unparseable
/// captured date is omitted rather than sent raw.
#[derive(Debug, Serialize)]
pub struct WireReceipt<'a> {
    #[serde(rename = "orderNumber")]
    pub order_number: &'a str,

    #[serde(rename = "orderDate", skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,

    #[serde(rename = "supplierName")]
    pub supplier_name: &'a str,

    #[serde(rename = "lineItems")]
    pub line_items: Vec<WireReceiptLine<'a>>,
}

/// Response of `POST /passthrough`; the payload key varies like find's.
#[derive(Debug, Deserialize)]
pub struct PassthroughResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(rename = "detail", alias = "result", alias = "data", default)]
    pub payload: Option<serde_json::Value>,
}

// =============================================================================
// Payables
// =============================================================================

/// One detail line on the AP wire payload. Amounts are decimal-dollar
/// strings, ex-GST.
#[derive(Debug, Serialize)]
pub struct WireDetailLine {
    #[serde(rename = "accountCode")]
    pub account_code: String,

    #[serde(rename = "subAccountCode")]
    pub sub_account_code: String,

    pub amount: String,

    #[serde(rename = "gstCode")]
    pub gst_code: &'static str,
}

/// One payable on `POST /payables` (the endpoint takes an array).
/// Dates are already in the AP endpoint's `M/D/YY` format.
#[derive(Debug, Serialize)]
pub struct PayableRequest {
    #[serde(rename = "supplierName")]
    pub supplier_name: String,

    #[serde(rename = "invoiceNumber")]
    pub invoice_number: String,

    #[serde(rename = "invoiceDate")]
    pub invoice_date: String,

    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(rename = "discountableAmount")]
    pub discountable_amount: String,

    #[serde(rename = "nonDiscountableAmount")]
    pub non_discountable_amount: String,

    #[serde(rename = "detailLines")]
    pub detail_lines: Vec<WireDetailLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_decodes_all_three_payload_keys() {
        for key in ["detail", "result", "data"] {
            let raw = format!(
                r#"{{"status":"ok","{key}":[{{"documentNumber":"AZ0031","poNumber":"AZ003463"}}]}}"#
            );
            let response: FindResponse = serde_json::from_str(&raw).unwrap();
            let records = response.into_records();
            assert_eq!(records.len(), 1, "key {key}");
            assert_eq!(records[0].document_number, "AZ0031");
            assert_eq!(records[0].po_number, "AZ003463");
            assert_eq!(records[0].billing_group_id, 0);
        }
    }

    #[test]
    fn test_find_missing_payload_is_empty_not_error() {
        let response: FindResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(response.into_records().is_empty());
    }

    #[test]
    fn test_wire_document_alternate_spellings() {
        let raw = r#"{"number":"AZ0031","poNumber":"AZ003463","customerName":"J. Castellan","billingGroupId":4}"#;
        let wire: WireDocument = serde_json::from_str(raw).unwrap();
        let record = DocumentRecord::from(wire);
        assert_eq!(record.document_number, "AZ0031");
        assert_eq!(record.customer_name.as_deref(), Some("J. Castellan"));
        assert_eq!(record.billing_group_id, 4);
    }

    #[test]
    fn test_create_response_into_record() {
        let raw = r#"{"status":"ok","result":"AZ0099","detail":{"docId":12044}}"#;
        let response: CreateResponse = serde_json::from_str(raw).unwrap();
        let record = response.into_record("AZ003463-0001").unwrap();
        assert_eq!(record.document_number, "AZ0099");
        assert_eq!(record.po_number, "AZ003463-0001");
        assert_eq!(record.doc_id, Some(12044));
        assert_eq!(record.billing_group_id, 0);
    }

    #[test]
    fn test_create_response_without_number_is_decode_error() {
        let response: CreateResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        let err = response.into_record("AZ003463").unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn test_billing_group_update_shapes() {
        let link = BillingGroupUpdate {
            number: "AZ0099",
            billing_group: WireBillingGroup {
                parent_order: Some("AZ0030"),
                description: None,
            },
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["billingGroup"]["parentOrder"], "AZ0030");
        assert!(json["billingGroup"].get("description").is_none());

        let create = BillingGroupUpdate {
            number: "AZ0030",
            billing_group: WireBillingGroup {
                parent_order: None,
                description: Some("AZ003463 billing group"),
            },
        };
        let json = serde_json::to_value(&create).unwrap();
        assert!(json["billingGroup"].get("parentOrder").is_none());
        assert_eq!(json["billingGroup"]["description"], "AZ003463 billing group");
    }

    #[test]
    fn test_payable_wire_shape() {
        let payable = PayableRequest {
            supplier_name: "Victoria Carpets".to_string(),
            invoice_number: "SI-4471".to_string(),
            invoice_date: "3/10/24".to_string(),
            due_date: None,
            discountable_amount: "0.00".to_string(),
            non_discountable_amount: "660.00".to_string(),
            detail_lines: vec![WireDetailLine {
                account_code: "5010".to_string(),
                sub_account_code: "00".to_string(),
                amount: "600.00".to_string(),
                gst_code: "GST",
            }],
        };
        let json = serde_json::to_value(&payable).unwrap();
        assert_eq!(json["invoiceDate"], "3/10/24");
        assert_eq!(json["detailLines"][0]["gstCode"], "GST");
        assert!(json.get("dueDate").is_none());
    }
}
