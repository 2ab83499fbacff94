//! # Remote Gateway
//!
//! The thin, retry-wrapped request layer over [`SessionManager`]. Exposes
//! the typed operations the rest of the bridge uses; performs NO
//! business-level matching (that is the matcher workflow's job). This
//! layer is purely transport plus auth plumbing.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   every operation:                                                      │
//! │                                                                         │
//! │   ensure session ──► POST basic(store, token) ──► 2xx? ──► decode       │
//! │         ▲                      │                                        │
//! │         │                401 / 403                                      │
//! │         │                      ▼                                        │
//! │         └── invalidate ◄── AuthRetry.on_unauthorized()                  │
//! │                                │                                        │
//! │                            Exhausted ──► GatewayError::Auth (fatal)     │
//! │                                                                         │
//! │   The credential can expire mid-session between unrelated calls, so    │
//! │   the bounded retry applies to EVERY operation, not just session        │
//! │   creation.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use tracing::{debug, info, warn};

use rfms_core::validation::validate_new_document;
use rfms_core::{
    APPosting, DocumentKind, DocumentRecord, Money, NewDocumentPayload, StockReceipt,
    SupplierInvoice, ValidationError,
};

use crate::config::GatewayConfig;
use crate::dates;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{
    AttachmentRequest, BillingGroupUpdate, CreateRequest, CreateResponse, FindRequest,
    FindResponse, PassthroughRequest, PassthroughResponse, PayableRequest, WireContact,
    WireDetailLine, WireReceipt, WireReceiptLine,
};
use crate::session::{AuthRetry, SessionManager};

/// Passthrough method used to post a stock receipt into remote inventory.
const RECEIVE_FROM_INVOICE: &str = "Inventory.ReceiveFromInvoice";

/// The session-managed RFMS API client.
pub struct RemoteGateway {
    http: reqwest::Client,
    session: Arc<SessionManager>,
    base_url: String,
}

impl RemoteGateway {
    /// Builds the gateway from configuration. The HTTP client carries the
    /// configured timeouts; no retry policy beyond the auth contract.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.http.connect_timeout())
            .timeout(config.http.request_timeout())
            .build()?;
        let session = Arc::new(SessionManager::new(http.clone(), config.api.clone()));
        Ok(RemoteGateway {
            http,
            session,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The session manager owning the cached credential.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a JSON POST under the session-retry contract: first attempt
    /// with the cached credential; on 401/403 invalidate, re-authenticate
    /// once, retry the original call once; a second auth failure is fatal.
    async fn post_authed<B>(&self, path: &str, body: &B) -> GatewayResult<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let mut attempt = AuthRetry::new();
        loop {
            let token = self.session.ensure().await?;
            let response = self
                .http
                .post(self.url(path))
                .basic_auth(self.session.store_code(), Some(&token))
                .json(body)
                .send()
                .await?;

            let status = response.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                self.session.invalidate().await;
                attempt = attempt.on_unauthorized();
                if attempt.may_retry() {
                    warn!(path, status = status.as_u16(), "unauthorized, re-authenticating once");
                    continue;
                }
                return Err(GatewayError::Auth(format!(
                    "HTTP {} on {} after re-authentication",
                    status.as_u16(),
                    path
                )));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::Http {
                    status: status.as_u16(),
                    body,
                });
            }
            return Ok(response);
        }
    }

    // =========================================================================
    // Typed Operations
    // =========================================================================

    /// Searches documents by a single search text. Callers drive this once
    /// per identifier variation.
    pub async fn find(&self, search_text: &str) -> GatewayResult<Vec<DocumentRecord>> {
        debug!(search_text, "order find");
        let response = self
            .post_authed("/order/find", &FindRequest { search_text })
            .await?;
        let decoded: FindResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(decoded.into_records())
    }

    /// Creates a new order or quote from a validated payload.
    pub async fn create(
        &self,
        kind: DocumentKind,
        payload: &NewDocumentPayload,
    ) -> GatewayResult<DocumentRecord> {
        validate_new_document(payload)?;
        let wire = CreateRequest {
            po_number: &payload.po_number,
            sold_to: WireContact::from(&payload.sold_to),
            estimate_total: payload.estimate_total.to_decimal_string(),
            contract_type: payload.contract_type.as_str(),
            ad_source: payload.ad_source.as_str(),
            description: payload.description.as_deref(),
        };
        let path = match kind {
            DocumentKind::Order => "/order/create",
            DocumentKind::Quote => "/quote/create",
        };
        let response = self.post_authed(path, &wire).await?;
        let decoded: CreateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        let record = decoded.into_record(&payload.po_number)?;
        info!(kind = kind.as_str(), document = %record.document_number, "document created");
        Ok(record)
    }

    /// Creates a new order from a validated payload.
    pub async fn create_order(
        &self,
        payload: &NewDocumentPayload,
    ) -> GatewayResult<DocumentRecord> {
        self.create(DocumentKind::Order, payload).await
    }

    /// Creates a new quote from a validated payload.
    pub async fn create_quote(
        &self,
        payload: &NewDocumentPayload,
    ) -> GatewayResult<DocumentRecord> {
        self.create(DocumentKind::Quote, payload).await
    }

    /// Attaches a file to a document. Bytes are base64-encoded on the wire.
    pub async fn attach_file(
        &self,
        document_number: &str,
        document_type: &str,
        file_extension: &str,
        description: &str,
        bytes: &[u8],
    ) -> GatewayResult<()> {
        let wire = AttachmentRequest {
            document_number,
            document_type,
            file_extension,
            description,
            file_data: BASE64.encode(bytes),
        };
        self.post_authed("/attachment", &wire).await?;
        debug!(document_number, size = bytes.len(), "attachment uploaded");
        Ok(())
    }

    /// Updates a document's billing-group membership (create-group or
    /// link-under-parent, depending on the block's populated field).
    pub async fn update_billing_group(&self, update: &BillingGroupUpdate<'_>) -> GatewayResult<()> {
        self.post_authed("/order", update).await?;
        Ok(())
    }

    /// Generic passthrough for operations without a dedicated endpoint.
    pub async fn call(
        &self,
        method_name: &str,
        request_payload: serde_json::Value,
    ) -> GatewayResult<serde_json::Value> {
        debug!(method_name, "passthrough call");
        let wire = PassthroughRequest {
            method_name,
            request_payload,
        };
        let response = self.post_authed("/passthrough", &wire).await?;
        let decoded: PassthroughResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(decoded.payload.unwrap_or(serde_json::Value::Null))
    }

    /// Posts a physical stock receipt into the remote inventory system via
    /// the passthrough. The receipt's captured dates and amounts are
    /// converted to the remote formats here.
    pub async fn receive_inventory(
        &self,
        receipt: &StockReceipt,
    ) -> GatewayResult<serde_json::Value> {
        let payload = serde_json::to_value(receipt_payload(receipt))?;
        self.call(RECEIVE_FROM_INVOICE, payload).await
    }

    /// Posts a balanced AP posting for a reconciled invoice.
    pub async fn post_payable(
        &self,
        invoice: &SupplierInvoice,
        posting: &APPosting,
    ) -> GatewayResult<()> {
        let payable = payable_request(invoice, posting)?;
        // the endpoint takes an array of payables
        self.post_authed("/payables", std::slice::from_ref(&payable))
            .await?;
        info!(invoice = %invoice.invoice_number, total = %posting.total_inc_gst, "AP posting sent");
        Ok(())
    }
}

// =============================================================================
// Wire Assembly
// =============================================================================

/// Assembles the inventory passthrough payload: the order date to
/// `MM-DD-YYYY` (omitted when the captured string is unparseable), unit
/// costs to decimal strings.
pub(crate) fn receipt_payload(receipt: &StockReceipt) -> WireReceipt<'_> {
    WireReceipt {
        order_number: &receipt.order_number,
        order_date: dates::search_date_from_raw(&receipt.order_date),
        supplier_name: &receipt.supplier_name,
        line_items: receipt
            .line_items
            .iter()
            .map(|line| WireReceiptLine {
                line_number: line.line_number,
                product_code: &line.product_code,
                quantity: line.quantity,
                unit_cost: line.unit_cost.to_decimal_string(),
            })
            .collect(),
    }
}

/// Assembles the AP wire payload: dates to `M/D/YY`, amounts to decimal
/// strings, the posting total split between discountable and
/// non-discountable depending on whether the supplier offers a settlement
/// discount.
pub(crate) fn payable_request(
    invoice: &SupplierInvoice,
    posting: &APPosting,
) -> GatewayResult<PayableRequest> {
    let invoice_date = dates::payable_date_from_raw(&invoice.invoice_date).ok_or_else(|| {
        GatewayError::from(ValidationError::InvalidFormat {
            field: "invoice_date".to_string(),
            reason: format!("unparseable date '{}'", invoice.invoice_date),
        })
    })?;
    let due_date = invoice
        .due_date
        .as_deref()
        .and_then(dates::payable_date_from_raw);

    let (discountable, non_discountable) = if invoice.supplier_discount.is_positive() {
        (posting.total_inc_gst, Money::zero())
    } else {
        (Money::zero(), posting.total_inc_gst)
    };

    Ok(PayableRequest {
        supplier_name: invoice.supplier_name.clone(),
        invoice_number: invoice.invoice_number.clone(),
        invoice_date,
        due_date,
        discountable_amount: discountable.to_decimal_string(),
        non_discountable_amount: non_discountable.to_decimal_string(),
        detail_lines: posting
            .detail_lines
            .iter()
            .map(|line| WireDetailLine {
                account_code: line.account_code.clone(),
                sub_account_code: line.sub_account_code.clone(),
                amount: line.amount.to_decimal_string(),
                gst_code: line.gst_code.as_str(),
            })
            .collect(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rfms_core::{APDetailLine, GstCode};

    fn invoice(discount_cents: i64) -> SupplierInvoice {
        SupplierInvoice {
            invoice_number: "SI-4471".to_string(),
            supplier_name: "Victoria Carpets".to_string(),
            order_reference: Some("AZ003463".to_string()),
            invoice_date: "2024-03-10".to_string(),
            due_date: Some("2024-04-10".to_string()),
            line_items: vec![],
            freight: Money::zero(),
            baling_handling: Money::zero(),
            supplier_discount: Money::from_cents(discount_cents),
            tax: Money::zero(),
            total: Money::from_cents(66000),
        }
    }

    fn posting() -> APPosting {
        APPosting {
            detail_lines: vec![
                APDetailLine {
                    account_code: "5010".to_string(),
                    sub_account_code: "00".to_string(),
                    amount: Money::from_cents(60000),
                    gst_code: GstCode::Gst,
                },
                APDetailLine {
                    account_code: "2150".to_string(),
                    sub_account_code: "00".to_string(),
                    amount: Money::from_cents(6000),
                    gst_code: GstCode::Paid,
                },
            ],
            total_ex_gst: Money::from_cents(60000),
            gst_amount: Money::from_cents(6000),
            total_inc_gst: Money::from_cents(66000),
        }
    }

    #[test]
    fn test_payable_dates_converted_at_boundary() {
        let payable = payable_request(&invoice(0), &posting()).unwrap();
        assert_eq!(payable.invoice_date, "3/10/24");
        assert_eq!(payable.due_date.as_deref(), Some("4/10/24"));
    }

    #[test]
    fn test_payable_amount_split_without_discount() {
        let payable = payable_request(&invoice(0), &posting()).unwrap();
        assert_eq!(payable.discountable_amount, "0.00");
        assert_eq!(payable.non_discountable_amount, "660.00");
    }

    #[test]
    fn test_payable_amount_split_with_discount() {
        let payable = payable_request(&invoice(1320), &posting()).unwrap();
        assert_eq!(payable.discountable_amount, "660.00");
        assert_eq!(payable.non_discountable_amount, "0.00");
    }

    #[test]
    fn test_payable_detail_lines_carry_gst_codes() {
        let payable = payable_request(&invoice(0), &posting()).unwrap();
        assert_eq!(payable.detail_lines.len(), 2);
        assert_eq!(payable.detail_lines[0].amount, "600.00");
        assert_eq!(payable.detail_lines[0].gst_code, "GST");
        assert_eq!(payable.detail_lines[1].gst_code, "PAID");
    }

    #[test]
    fn test_receipt_payload_dates_converted_at_boundary() {
        let receipt = StockReceipt {
            order_number: "AZ003463".to_string(),
            order_date: "2024-03-10".to_string(),
            supplier_name: "Victoria Carpets".to_string(),
            line_items: vec![rfms_core::ReceiptLine {
                line_number: 1,
                product_code: "01-AXM-4457".to_string(),
                quantity: 10,
                unit_cost: Money::from_cents(2500),
            }],
        };
        let json = serde_json::to_value(receipt_payload(&receipt)).unwrap();
        assert_eq!(json["orderDate"], "03-10-2024");
        assert_eq!(json["lineItems"][0]["unitCost"], "25.00");
        assert_eq!(json["lineItems"][0]["lineNumber"], 1);
    }

    #[test]
    fn test_receipt_payload_omits_unparseable_date() {
        let receipt = StockReceipt {
            order_number: "AZ003463".to_string(),
            order_date: "circa march".to_string(),
            supplier_name: "Victoria Carpets".to_string(),
            line_items: vec![],
        };
        let json = serde_json::to_value(receipt_payload(&receipt)).unwrap();
        assert!(json.get("orderDate").is_none());
    }

    #[test]
    fn test_unparseable_invoice_date_rejected() {
        let mut bad = invoice(0);
        bad.invoice_date = "circa march".to_string();
        let err = payable_request(&bad, &posting()).unwrap_err();
        assert!(matches!(err, GatewayError::Core(_)));
    }
}
