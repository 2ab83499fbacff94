//! # Domain Types
//!
//! Core domain types for document reconciliation and AP posting.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DocumentRecord  │   │  StockReceipt   │   │ SupplierInvoice │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │ document_number │   │  order_number   │   │  invoice_number │       │
//! │  │ po_number (key) │   │  order_date     │   │  supplier_name  │       │
//! │  │ billing_group_id│   │  line_items     │   │  freight, total │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────┐   ┌─────────────────────────────────┐     │
//! │  │ ReconciliationOutcome   │   │          APPosting              │     │
//! │  │  ─────────────────────  │   │  ─────────────────────────────  │     │
//! │  │ exactly five terminal   │   │  detail lines (ex-GST) + GST    │     │
//! │  │ states, never an error  │   │  line, balanced to the cent     │     │
//! │  └─────────────────────────┘   └─────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The remote system's stringly-typed configuration dimensions (contract
//! types, ad sources, product categories) are typed enumerations with
//! explicit defaults and alias-resolution tables, constructed once.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Document Kind
// =============================================================================

/// Whether an inbound document is an order or a quote.
///
/// Quotes have no billing-group concept: the matcher never takes the
/// parent-prefix branch for a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Order,
    Quote,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Order => "order",
            DocumentKind::Quote => "quote",
        }
    }
}

// =============================================================================
// Document Record
// =============================================================================

/// A document as it exists in the remote system. Not owned by this system;
/// identified by its displayed document number (e.g. "AZ0031" for an order,
/// "AQ0031" for a quote).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Displayed document number - the remote identity.
    pub document_number: String,

    /// Customer PO reference - the match key for reconciliation.
    pub po_number: String,

    /// Billing group this document belongs to. 0 = ungrouped.
    #[serde(default)]
    pub billing_group_id: i64,

    /// Remote-internal id, when the endpoint returns one.
    #[serde(default)]
    pub doc_id: Option<i64>,

    /// Sold-to customer name, when the endpoint returns one.
    #[serde(default)]
    pub customer_name: Option<String>,
}

impl DocumentRecord {
    /// True if this document already belongs to a billing group.
    #[inline]
    pub fn is_grouped(&self) -> bool {
        self.billing_group_id != 0
    }
}

// =============================================================================
// Reconciliation Outcome
// =============================================================================

/// The terminal state of the match-or-create-or-link decision procedure.
///
/// Exactly five states. All of them are expected business paths, not
/// errors; callers branch on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReconciliationOutcome {
    /// The identifier matched an existing order exactly.
    ExistingOrder { record: DocumentRecord },

    /// The identifier matched an existing quote exactly.
    ExistingQuote { record: DocumentRecord },

    /// No match; a new order was created.
    NewOrder { record: DocumentRecord },

    /// No match; a new quote was created.
    NewQuote { record: DocumentRecord },

    /// A sibling sharing the identifier prefix was found; a new order was
    /// created and linked under the parent's billing group.
    BillingGroupAdded {
        record: DocumentRecord,
        parent: DocumentRecord,
    },
}

impl ReconciliationOutcome {
    /// The matched or created document, whichever terminal state applies.
    pub fn record(&self) -> &DocumentRecord {
        match self {
            ReconciliationOutcome::ExistingOrder { record }
            | ReconciliationOutcome::ExistingQuote { record }
            | ReconciliationOutcome::NewOrder { record }
            | ReconciliationOutcome::NewQuote { record }
            | ReconciliationOutcome::BillingGroupAdded { record, .. } => record,
        }
    }

    /// True for the states that created a document remotely.
    pub fn created(&self) -> bool {
        matches!(
            self,
            ReconciliationOutcome::NewOrder { .. }
                | ReconciliationOutcome::NewQuote { .. }
                | ReconciliationOutcome::BillingGroupAdded { .. }
        )
    }
}

// =============================================================================
// Stock Receipt
// =============================================================================

/// A line on a physical stock receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub line_number: u32,

    /// Product code; the first two digits are the product-category code.
    pub product_code: String,

    pub quantity: i64,

    /// Unit cost, already GST-exclusive on order lines.
    pub unit_cost: Money,
}

impl ReceiptLine {
    /// Ex-GST line total (unit cost × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_cost.multiply_quantity(self.quantity)
    }
}

/// A physical stock receipt, created when stock arrives. Immutable once
/// posted to the remote inventory system.
///
/// Dates are carried as the raw captured strings; the reconciler parses
/// them with the flexible multi-format parser, and the gateway formats
/// remote dates at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReceipt {
    pub order_number: String,
    pub order_date: String,
    pub supplier_name: String,
    pub line_items: Vec<ReceiptLine>,
}

// =============================================================================
// Supplier Invoice
// =============================================================================

/// A line item scraped from a supplier invoice. Consumed only; produced by
/// the external extraction collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<Money>,
    pub amount: Money,
}

/// A supplier invoice produced by external extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInvoice {
    pub invoice_number: String,
    pub supplier_name: String,

    /// The invoice's stated order/PO reference, when the supplier prints
    /// one. May reference only the parent document.
    #[serde(default)]
    pub order_reference: Option<String>,

    pub invoice_date: String,
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub line_items: Vec<InvoiceLine>,

    /// Freight charge, GST-inclusive as printed.
    #[serde(default)]
    pub freight: Money,

    /// Baling/handling charge, GST-inclusive as printed.
    #[serde(default)]
    pub baling_handling: Money,

    /// Early-settlement discount offered by the supplier.
    #[serde(default)]
    pub supplier_discount: Money,

    /// GST as stated on the invoice.
    #[serde(default)]
    pub tax: Money,

    /// Total as stated on the invoice - the external source of record.
    pub total: Money,
}

// =============================================================================
// AP Posting
// =============================================================================

/// GST treatment code on an AP detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GstCode {
    /// GST applies to this ex-GST amount.
    #[serde(rename = "GST")]
    Gst,

    /// The GST-payable line itself (distinct tax code; never compounded).
    #[serde(rename = "PAID")]
    Paid,
}

impl GstCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GstCode::Gst => "GST",
            GstCode::Paid => "PAID",
        }
    }
}

/// One detail line of an AP posting. Amounts are ex-GST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct APDetailLine {
    pub account_code: String,
    pub sub_account_code: String,
    pub amount: Money,
    pub gst_code: GstCode,
}

/// A balanced accounts-payable posting.
///
/// Invariant: `total_inc_gst == total_ex_gst + gst_amount` to the cent,
/// except when the posting total was deferred to the invoice's stated
/// total after a tolerance breach (the invoice is the source of record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct APPosting {
    pub detail_lines: Vec<APDetailLine>,
    pub total_ex_gst: Money,
    pub gst_amount: Money,
    pub total_inc_gst: Money,
}

impl APPosting {
    /// True when the inc-GST total equals ex-GST + GST to the cent.
    pub fn is_balanced(&self) -> bool {
        self.total_inc_gst == self.total_ex_gst + self.gst_amount
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// The 2-digit product-category code (01-12) carried in the leading digits
/// of a product code. Each category posts to its own purchases account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Carpet,      // 01
    Vinyl,       // 02
    Timber,      // 03
    Laminate,    // 04
    Tile,        // 05
    Rug,         // 06
    Underlay,    // 07
    Accessory,   // 08
    Adhesive,    // 09
    Trim,        // 10
    Installation, // 11
    Sundries,    // 12 - also the fallback for unknown codes
}

impl ProductCategory {
    /// Resolves the category from a product code's leading 2 digits.
    /// Codes outside 01-12 fall into [`ProductCategory::Sundries`].
    pub fn from_product_code(code: &str) -> Self {
        let digits: String = code.chars().take(2).collect();
        match digits.as_str() {
            "01" => ProductCategory::Carpet,
            "02" => ProductCategory::Vinyl,
            "03" => ProductCategory::Timber,
            "04" => ProductCategory::Laminate,
            "05" => ProductCategory::Tile,
            "06" => ProductCategory::Rug,
            "07" => ProductCategory::Underlay,
            "08" => ProductCategory::Accessory,
            "09" => ProductCategory::Adhesive,
            "10" => ProductCategory::Trim,
            "11" => ProductCategory::Installation,
            _ => ProductCategory::Sundries,
        }
    }

    /// The purchases account this category posts to.
    pub fn account_code(&self) -> &'static str {
        match self {
            ProductCategory::Carpet => "5010",
            ProductCategory::Vinyl => "5020",
            ProductCategory::Timber => "5030",
            ProductCategory::Laminate => "5040",
            ProductCategory::Tile => "5050",
            ProductCategory::Rug => "5060",
            ProductCategory::Underlay => "5070",
            ProductCategory::Accessory => "5080",
            ProductCategory::Adhesive => "5090",
            ProductCategory::Trim => "5100",
            ProductCategory::Installation => "5110",
            ProductCategory::Sundries => "5120",
        }
    }
}

// =============================================================================
// Configuration Enumerations
// =============================================================================

/// Contract type on a new document. The remote API takes free-form strings;
/// inbound documents spell these many ways, resolved here once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    Residential,
    Commercial,
    Insurance,
    Builder,
}

impl ContractType {
    /// Resolves a free-form spelling; unknown values take the default.
    pub fn resolve(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "residential" | "res" | "retail" => ContractType::Residential,
            "commercial" | "comm" => ContractType::Commercial,
            "insurance" | "ins" | "claim" => ContractType::Insurance,
            "builder" | "build" | "new home" => ContractType::Builder,
            _ => ContractType::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Residential => "Residential",
            ContractType::Commercial => "Commercial",
            ContractType::Insurance => "Insurance",
            ContractType::Builder => "Builder",
        }
    }
}

/// Advertising source recorded on a new document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdSource {
    #[default]
    Unknown,
    Web,
    Referral,
    RepeatCustomer,
    WalkIn,
}

impl AdSource {
    /// Resolves a free-form spelling; unknown values take the default.
    pub fn resolve(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "web" | "website" | "internet" | "google" | "online" => AdSource::Web,
            "referral" | "referred" | "word of mouth" => AdSource::Referral,
            "repeat" | "repeat customer" | "existing" => AdSource::RepeatCustomer,
            "walk in" | "walk-in" | "walkin" => AdSource::WalkIn,
            _ => AdSource::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdSource::Unknown => "Unknown",
            AdSource::Web => "Web",
            AdSource::Referral => "Referral",
            AdSource::RepeatCustomer => "Repeat Customer",
            AdSource::WalkIn => "Walk In",
        }
    }
}

// =============================================================================
// New Document Payload
// =============================================================================

/// Sold-to contact details on a new document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// The candidate new-document payload handed to the matcher. If the
/// decision procedure ends in a create, this becomes the remote document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocumentPayload {
    /// The inbound PO reference (pre-normalization raw string).
    pub po_number: String,

    pub sold_to: Contact,

    /// Quoted/estimated total for the document.
    pub estimate_total: Money,

    #[serde(default)]
    pub contract_type: ContractType,

    #[serde(default)]
    pub ad_source: AdSource,

    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_record_grouping() {
        let mut record = DocumentRecord {
            document_number: "AZ0031".to_string(),
            po_number: "AZ003463".to_string(),
            billing_group_id: 0,
            doc_id: None,
            customer_name: None,
        };
        assert!(!record.is_grouped());
        record.billing_group_id = 17;
        assert!(record.is_grouped());
    }

    #[test]
    fn test_outcome_record_access() {
        let record = DocumentRecord {
            document_number: "AZ0031".to_string(),
            po_number: "AZ003463".to_string(),
            billing_group_id: 0,
            doc_id: None,
            customer_name: None,
        };
        let outcome = ReconciliationOutcome::NewOrder {
            record: record.clone(),
        };
        assert_eq!(outcome.record(), &record);
        assert!(outcome.created());

        let outcome = ReconciliationOutcome::ExistingQuote { record };
        assert!(!outcome.created());
    }

    #[test]
    fn test_product_category_resolution() {
        assert_eq!(
            ProductCategory::from_product_code("01-AXM-4457"),
            ProductCategory::Carpet
        );
        assert_eq!(
            ProductCategory::from_product_code("11INSTALL"),
            ProductCategory::Installation
        );
        // out-of-range and malformed codes fall into sundries
        assert_eq!(
            ProductCategory::from_product_code("47-X"),
            ProductCategory::Sundries
        );
        assert_eq!(
            ProductCategory::from_product_code("X"),
            ProductCategory::Sundries
        );
    }

    #[test]
    fn test_contract_type_aliases() {
        assert_eq!(ContractType::resolve("COMM"), ContractType::Commercial);
        assert_eq!(ContractType::resolve("claim"), ContractType::Insurance);
        assert_eq!(ContractType::resolve("whatever"), ContractType::Residential);
    }

    #[test]
    fn test_ad_source_aliases() {
        assert_eq!(AdSource::resolve("Google"), AdSource::Web);
        assert_eq!(AdSource::resolve("walk-in"), AdSource::WalkIn);
        assert_eq!(AdSource::resolve(""), AdSource::Unknown);
    }

    #[test]
    fn test_gst_code_wire_spelling() {
        assert_eq!(serde_json::to_string(&GstCode::Gst).unwrap(), "\"GST\"");
        assert_eq!(serde_json::to_string(&GstCode::Paid).unwrap(), "\"PAID\"");
    }
}
