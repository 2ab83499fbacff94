//! # Invoice Reconciliation
//!
//! Fuzzy-matches a physical stock receipt against scraped candidate
//! supplier invoices. A successful match enables the AP posting downstream;
//! no match is a valid outcome (it triggers an external notification path),
//! never an error.
//!
//! ## Matching Rule (AND of ORs)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  supplier name fuzzy-matches (when one is supplied)                     │
//! │        AND                                                              │
//! │  ( order-number variation appears in the invoice's order reference      │
//! │      (substring, both directions, parent fallback)                      │
//! │    OR                                                                   │
//! │    packing-slip token matches the invoice number                        │
//! │      (direct, or after stripping a leading alpha prefix:                │
//! │       "SI-12345" vs "12345" vs "INV12345") )                            │
//! │        AND                                                              │
//! │  invoice date within ±2 calendar days of the receipt date (inclusive,   │
//! │  date-only; unparseable dates skip this gate)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use tracing::debug;

use crate::identifier::CanonicalIdentifier;
use crate::types::{StockReceipt, SupplierInvoice};

/// Date fuzziness window, inclusive, in calendar days. Fixed, not
/// configurable.
pub const DATE_MATCH_TOLERANCE_DAYS: i64 = 2;

/// Accepted input date formats, tried in order. Day-first orderings come
/// before month-first: this deployment's native convention is DD/MM, with
/// MM/DD appearing only on US-sourced supplier paperwork.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y"];

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses a date string in any of the five accepted formats, discarding any
/// time-of-day component.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw
        .trim()
        .split(['T', ' '])
        .next()
        .unwrap_or_default();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// True when the two dates are within the ±2 day window, inclusive.
pub fn dates_within_tolerance(a: NaiveDate, b: NaiveDate) -> bool {
    (a - b).num_days().abs() <= DATE_MATCH_TOLERANCE_DAYS
}

// =============================================================================
// Field Matchers
// =============================================================================

/// Case-insensitive substring match, either direction. An empty receipt
/// supplier means "no supplier supplied" and always passes; an empty
/// invoice supplier can never satisfy a supplied name.
fn supplier_matches(receipt_supplier: &str, invoice_supplier: &str) -> bool {
    let receipt = receipt_supplier.trim().to_lowercase();
    if receipt.is_empty() {
        return true;
    }
    let invoice = invoice_supplier.trim().to_lowercase();
    if invoice.is_empty() {
        return false;
    }
    receipt.contains(&invoice) || invoice.contains(&receipt)
}

/// True when any variation of the receipt identifier appears as a substring
/// of the invoice's stated order reference (checked both directions), with
/// a fallback on the suffix-stripped parent - invoices often reference only
/// the parent document.
fn order_reference_matches(id: &CanonicalIdentifier, invoice_reference: &str) -> bool {
    let reference = invoice_reference.trim().to_uppercase();
    if reference.is_empty() {
        return false;
    }
    let mut spellings = id.variations();
    if let Some(parent) = id.parent() {
        spellings.extend(parent.variations());
    }
    spellings
        .iter()
        .any(|v| reference.contains(v.as_str()) || v.contains(&reference))
}

/// Strips a leading alphabetic prefix and an optional separator, so
/// "SI-12345", "INV12345" and "12345" all reduce to "12345".
fn strip_alpha_prefix(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.trim_start_matches(['-', '#', ' '])
}

/// True when the packing-slip token matches the invoice number directly or
/// after stripping a leading alphabetic prefix from either side.
fn packing_slip_matches(token: &str, invoice_number: &str) -> bool {
    let token = token.trim().to_uppercase();
    let invoice = invoice_number.trim().to_uppercase();
    if token.is_empty() || invoice.is_empty() {
        return false;
    }
    if token == invoice {
        return true;
    }
    let token_stripped = strip_alpha_prefix(&token);
    let invoice_stripped = strip_alpha_prefix(&invoice);
    !token_stripped.is_empty() && token_stripped == invoice_stripped
}

// =============================================================================
// Reconciler
// =============================================================================

/// Matches a stock receipt against candidate supplier invoices.
///
/// The packing-slip token accompanies the receipt at the call site (it
/// arrives with the invoice paperwork, not the stock; receipts are
/// immutable once posted). Returns the first candidate satisfying the
/// matching rule, in candidate order - deterministic for a given list.
/// `None` is a valid outcome.
pub fn match_invoice<'a>(
    receipt: &StockReceipt,
    packing_slip: Option<&str>,
    candidates: &'a [SupplierInvoice],
) -> Option<&'a SupplierInvoice> {
    let id = CanonicalIdentifier::normalize(&receipt.order_number);
    let receipt_date = parse_flexible_date(&receipt.order_date);

    for invoice in candidates {
        if !supplier_matches(&receipt.supplier_name, &invoice.supplier_name) {
            continue;
        }

        let order_hit = invoice
            .order_reference
            .as_deref()
            .is_some_and(|reference| order_reference_matches(&id, reference));
        let slip_hit = packing_slip
            .is_some_and(|token| packing_slip_matches(token, &invoice.invoice_number));
        if !order_hit && !slip_hit {
            continue;
        }

        // Date gate: enforced only when both sides parse
        if let (Some(receipt_date), Some(invoice_date)) =
            (receipt_date, parse_flexible_date(&invoice.invoice_date))
        {
            if !dates_within_tolerance(receipt_date, invoice_date) {
                continue;
            }
        }

        debug!(
            invoice = %invoice.invoice_number,
            order = %receipt.order_number,
            order_hit,
            slip_hit,
            "receipt reconciled to supplier invoice"
        );
        return Some(invoice);
    }

    None
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn receipt(order: &str, date: &str, supplier: &str) -> StockReceipt {
        StockReceipt {
            order_number: order.to_string(),
            order_date: date.to_string(),
            supplier_name: supplier.to_string(),
            line_items: vec![],
        }
    }

    fn invoice(number: &str, supplier: &str, reference: Option<&str>, date: &str) -> SupplierInvoice {
        SupplierInvoice {
            invoice_number: number.to_string(),
            supplier_name: supplier.to_string(),
            order_reference: reference.map(str::to_string),
            invoice_date: date.to_string(),
            due_date: None,
            line_items: vec![],
            freight: Money::zero(),
            baling_handling: Money::zero(),
            supplier_discount: Money::zero(),
            tax: Money::zero(),
            total: Money::from_cents(110000),
        }
    }

    #[test]
    fn test_parse_all_five_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(parse_flexible_date("2024-03-10"), Some(expected));
        assert_eq!(parse_flexible_date("10/03/2024"), Some(expected));
        assert_eq!(parse_flexible_date("10-03-2024"), Some(expected));
        // unambiguous month-first forms fall through to the MM orderings
        assert_eq!(parse_flexible_date("03/25/2024"), NaiveDate::from_ymd_opt(2024, 3, 25));
        assert_eq!(parse_flexible_date("03-25-2024"), NaiveDate::from_ymd_opt(2024, 3, 25));
        assert_eq!(parse_flexible_date("garbage"), None);
    }

    #[test]
    fn test_time_of_day_discarded() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(parse_flexible_date("2024-03-10T14:30:00"), Some(expected));
        assert_eq!(parse_flexible_date("2024-03-10 14:30"), Some(expected));
    }

    #[test]
    fn test_date_tolerance_boundaries() {
        let r = receipt("AZ003463", "2024-03-10", "Victoria Carpets");
        let hit_low = invoice("SI-1", "Victoria Carpets", Some("AZ003463"), "2024-03-08");
        let hit_high = invoice("SI-2", "Victoria Carpets", Some("AZ003463"), "2024-03-12");
        let miss_low = invoice("SI-3", "Victoria Carpets", Some("AZ003463"), "2024-03-07");
        let miss_high = invoice("SI-4", "Victoria Carpets", Some("AZ003463"), "2024-03-13");

        assert!(match_invoice(&r, None, std::slice::from_ref(&hit_low)).is_some());
        assert!(match_invoice(&r, None, std::slice::from_ref(&hit_high)).is_some());
        assert!(match_invoice(&r, None, std::slice::from_ref(&miss_low)).is_none());
        assert!(match_invoice(&r, None, std::slice::from_ref(&miss_high)).is_none());
    }

    #[test]
    fn test_supplier_fuzzy_both_directions() {
        assert!(supplier_matches("Victoria Carpets", "VICTORIA CARPETS PTY LTD"));
        assert!(supplier_matches("Victoria Carpets Pty Ltd", "victoria carpets"));
        assert!(!supplier_matches("Victoria Carpets", "Godfrey Hirst"));
        // no supplier supplied on the receipt: the gate passes
        assert!(supplier_matches("", "Godfrey Hirst"));
        // but a supplied name can never match an empty invoice supplier
        assert!(!supplier_matches("Victoria Carpets", ""));
    }

    #[test]
    fn test_order_reference_parent_fallback() {
        // the invoice references only the parent document
        let id = CanonicalIdentifier::normalize("AZ003463-0001");
        assert!(order_reference_matches(&id, "AZ003463"));
        assert!(order_reference_matches(&id, "PO AZ0034630001"));
        assert!(!order_reference_matches(&id, "AZ999999"));
        assert!(!order_reference_matches(&id, ""));
    }

    #[test]
    fn test_packing_slip_prefix_conventions() {
        assert!(packing_slip_matches("SI-12345", "12345"));
        assert!(packing_slip_matches("12345", "INV12345"));
        assert!(packing_slip_matches("si-12345", "INV-12345"));
        assert!(packing_slip_matches("12345", "12345"));
        assert!(!packing_slip_matches("12345", "12346"));
        assert!(!packing_slip_matches("", "12345"));
    }

    #[test]
    fn test_slip_match_alone_suffices() {
        // no order reference on the invoice at all; the slip token carries it
        let r = receipt("AZ003463", "2024-03-10", "Victoria Carpets");
        let inv = invoice("INV-88421", "Victoria Carpets Pty Ltd", None, "2024-03-10");
        assert!(match_invoice(&r, Some("88421"), std::slice::from_ref(&inv)).is_some());
        assert!(match_invoice(&r, None, std::slice::from_ref(&inv)).is_none());
    }

    #[test]
    fn test_supplier_gate_is_mandatory() {
        // order reference matches but the supplier does not
        let r = receipt("AZ003463", "2024-03-10", "Victoria Carpets");
        let inv = invoice("SI-1", "Godfrey Hirst", Some("AZ003463"), "2024-03-10");
        assert!(match_invoice(&r, None, std::slice::from_ref(&inv)).is_none());
    }

    #[test]
    fn test_unparseable_dates_skip_the_gate() {
        let r = receipt("AZ003463", "circa march", "Victoria Carpets");
        let inv = invoice("SI-1", "Victoria Carpets", Some("AZ003463"), "2024-03-10");
        assert!(match_invoice(&r, None, std::slice::from_ref(&inv)).is_some());
    }

    #[test]
    fn test_first_candidate_wins_deterministically() {
        let r = receipt("AZ003463", "2024-03-10", "Victoria Carpets");
        let candidates = [
            invoice("SI-1", "Victoria Carpets", Some("AZ003463"), "2024-03-09"),
            invoice("SI-2", "Victoria Carpets", Some("AZ003463"), "2024-03-10"),
        ];
        let found = match_invoice(&r, None, &candidates).unwrap();
        assert_eq!(found.invoice_number, "SI-1");
    }

    #[test]
    fn test_no_match_is_a_valid_outcome() {
        let r = receipt("AZ003463", "2024-03-10", "Victoria Carpets");
        assert!(match_invoice(&r, None, &[]).is_none());
    }
}
