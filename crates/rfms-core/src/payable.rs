//! # AP Posting Builder
//!
//! Decomposes a reconciled supplier invoice into GST-exclusive charge
//! categories and emits a balanced accounts-payable posting.
//!
//! ## Decomposition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  order lines ──group by 2-digit category──► one detail line each        │
//! │               (unit_cost × qty, already ex-GST)            [GST code]   │
//! │                                                                         │
//! │  invoice freight ────────÷ 1.1──► freight detail line      [GST code]   │
//! │  invoice baling/handling ÷ 1.1──► handling detail line     [GST code]   │
//! │                                                                         │
//! │  10% of summed ex-GST GST-coded total ──► GST detail line  [PAID code]  │
//! │                                                                         │
//! │  inc-GST total vs invoice stated total:                                 │
//! │    within $2.00  → keep computed total                                  │
//! │    beyond $2.00  → TRUST THE INVOICE TOTAL (source of record), keep     │
//! │                    the computed detail lines, log the variance          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{APDetailLine, APPosting, GstCode, ProductCategory, ReceiptLine, SupplierInvoice};

/// Maximum accepted variance between the computed inc-GST total and the
/// invoice's stated total. Beyond this the invoice total is preferred -
/// never an error. Fixed, not configurable.
pub const AP_VARIANCE_TOLERANCE: Money = Money::from_cents(200);

/// Account the freight detail line posts to.
const FREIGHT_ACCOUNT: &str = "5300";

/// Account the baling/handling detail line posts to.
const HANDLING_ACCOUNT: &str = "5310";

/// GST clearing account for the GST-payable line.
const GST_ACCOUNT: &str = "2150";

/// Sub-account used on every generated line; the remote chart does not
/// subdivide purchase accounts.
const SUB_ACCOUNT: &str = "00";

/// Builds a balanced AP posting from a supplier invoice and the matching
/// order line data.
///
/// Order-line costs are already GST-exclusive; freight and baling/handling
/// from the invoice are GST-inclusive and divided by 1.1 first. A posting
/// with zero detail lines is rejected as invalid input.
pub fn build(invoice: &SupplierInvoice, order_lines: &[ReceiptLine]) -> CoreResult<APPosting> {
    // One detail line per product category, in category order (BTreeMap
    // keeps the grouping deterministic).
    let mut by_category: BTreeMap<ProductCategory, Money> = BTreeMap::new();
    for line in order_lines {
        let category = ProductCategory::from_product_code(&line.product_code);
        *by_category.entry(category).or_insert(Money::zero()) += line.line_total();
    }

    let mut detail_lines: Vec<APDetailLine> = by_category
        .into_iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(category, amount)| APDetailLine {
            account_code: category.account_code().to_string(),
            sub_account_code: SUB_ACCOUNT.to_string(),
            amount,
            gst_code: GstCode::Gst,
        })
        .collect();

    if !invoice.freight.is_zero() {
        detail_lines.push(APDetailLine {
            account_code: FREIGHT_ACCOUNT.to_string(),
            sub_account_code: SUB_ACCOUNT.to_string(),
            amount: invoice.freight.ex_gst(),
            gst_code: GstCode::Gst,
        });
    }
    if !invoice.baling_handling.is_zero() {
        detail_lines.push(APDetailLine {
            account_code: HANDLING_ACCOUNT.to_string(),
            sub_account_code: SUB_ACCOUNT.to_string(),
            amount: invoice.baling_handling.ex_gst(),
            gst_code: GstCode::Gst,
        });
    }

    if detail_lines.is_empty() {
        return Err(CoreError::EmptyPosting {
            invoice_number: invoice.invoice_number.clone(),
        });
    }

    // GST payable: exactly 10% of the summed ex-GST total across all
    // GST-coded lines, as its own line with the distinct tax code.
    let total_ex_gst: Money = detail_lines
        .iter()
        .filter(|line| line.gst_code == GstCode::Gst)
        .map(|line| line.amount)
        .sum();
    let gst_amount = total_ex_gst.gst();
    if !gst_amount.is_zero() {
        detail_lines.push(APDetailLine {
            account_code: GST_ACCOUNT.to_string(),
            sub_account_code: SUB_ACCOUNT.to_string(),
            amount: gst_amount,
            gst_code: GstCode::Paid,
        });
    }

    let mut total_inc_gst = total_ex_gst + gst_amount;

    // The invoice is the external source of record: beyond the tolerance
    // its stated total wins, while the category detail lines keep their
    // computed values.
    let variance = (total_inc_gst - invoice.total).abs();
    if variance > AP_VARIANCE_TOLERANCE {
        warn!(
            invoice = %invoice.invoice_number,
            computed = %total_inc_gst,
            stated = %invoice.total,
            variance = %variance,
            "computed total beyond tolerance, deferring to invoice total"
        );
        total_inc_gst = invoice.total;
    }

    Ok(APPosting {
        detail_lines,
        total_ex_gst,
        gst_amount,
        total_inc_gst,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(freight_cents: i64, baling_cents: i64, total_cents: i64) -> SupplierInvoice {
        SupplierInvoice {
            invoice_number: "SI-4471".to_string(),
            supplier_name: "Victoria Carpets".to_string(),
            order_reference: Some("AZ003463".to_string()),
            invoice_date: "2024-03-10".to_string(),
            due_date: Some("2024-04-10".to_string()),
            line_items: vec![],
            freight: Money::from_cents(freight_cents),
            baling_handling: Money::from_cents(baling_cents),
            supplier_discount: Money::zero(),
            tax: Money::zero(),
            total: Money::from_cents(total_cents),
        }
    }

    fn line(product_code: &str, quantity: i64, unit_cost_cents: i64) -> ReceiptLine {
        ReceiptLine {
            line_number: 1,
            product_code: product_code.to_string(),
            quantity,
            unit_cost: Money::from_cents(unit_cost_cents),
        }
    }

    #[test]
    fn test_freight_decomposition() {
        // freight $110.00 inc-GST, nothing else: the freight line is
        // exactly $100.00 ex-GST and GST on $100 is exactly $10.00
        let posting = build(&invoice(11000, 0, 11000), &[]).unwrap();

        assert_eq!(posting.detail_lines.len(), 2);
        let freight = &posting.detail_lines[0];
        assert_eq!(freight.account_code, FREIGHT_ACCOUNT);
        assert_eq!(freight.amount.cents(), 10000);
        assert_eq!(freight.gst_code, GstCode::Gst);

        let gst = &posting.detail_lines[1];
        assert_eq!(gst.account_code, GST_ACCOUNT);
        assert_eq!(gst.amount.cents(), 1000);
        assert_eq!(gst.gst_code, GstCode::Paid);

        assert_eq!(posting.total_ex_gst.cents(), 10000);
        assert_eq!(posting.gst_amount.cents(), 1000);
        assert_eq!(posting.total_inc_gst.cents(), 11000);
        assert!(posting.is_balanced());
    }

    #[test]
    fn test_category_grouping() {
        // two carpet lines group into one detail line; vinyl gets its own
        let lines = vec![
            line("01-AXM-4457", 10, 2500), // $250.00 carpet
            line("01-BRX-1102", 4, 5000),  // $200.00 carpet
            line("02-VNL-0031", 2, 7500),  // $150.00 vinyl
        ];
        let posting = build(&invoice(0, 0, 66000), &lines).unwrap();

        // carpet, vinyl, GST
        assert_eq!(posting.detail_lines.len(), 3);
        assert_eq!(posting.detail_lines[0].account_code, "5010");
        assert_eq!(posting.detail_lines[0].amount.cents(), 45000);
        assert_eq!(posting.detail_lines[1].account_code, "5020");
        assert_eq!(posting.detail_lines[1].amount.cents(), 15000);
        assert_eq!(posting.total_ex_gst.cents(), 60000);
        assert_eq!(posting.gst_amount.cents(), 6000);
        assert!(posting.is_balanced());
    }

    #[test]
    fn test_unknown_category_falls_to_sundries() {
        let posting = build(&invoice(0, 0, 1100), &[line("99-MISC", 1, 1000)]).unwrap();
        assert_eq!(posting.detail_lines[0].account_code, "5120");
    }

    #[test]
    fn test_baling_handling_line() {
        let posting = build(&invoice(0, 2200, 2200), &[]).unwrap();
        assert_eq!(posting.detail_lines[0].account_code, HANDLING_ACCOUNT);
        assert_eq!(posting.detail_lines[0].amount.cents(), 2000);
    }

    #[test]
    fn test_within_tolerance_keeps_computed_total() {
        // computed inc-GST $660.00 vs stated $661.50: inside $2.00
        let posting = build(&invoice(0, 0, 66150), &[line("01", 10, 6000)]).unwrap();
        assert_eq!(posting.total_inc_gst.cents(), 66000);
        assert!(posting.is_balanced());
    }

    #[test]
    fn test_beyond_tolerance_defers_to_invoice_total() {
        // computed inc-GST $660.00 vs stated $700.00: invoice total wins,
        // detail lines keep their computed values
        let posting = build(&invoice(0, 0, 70000), &[line("01", 10, 6000)]).unwrap();
        assert_eq!(posting.total_inc_gst.cents(), 70000);
        assert_eq!(posting.total_ex_gst.cents(), 60000);
        assert_eq!(posting.gst_amount.cents(), 6000);
        assert_eq!(posting.detail_lines[0].amount.cents(), 60000);
        assert!(!posting.is_balanced());
    }

    #[test]
    fn test_zero_detail_lines_rejected() {
        let err = build(&invoice(0, 0, 0), &[]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyPosting { .. }));
    }

    #[test]
    fn test_zero_amount_lines_dropped() {
        // a zero-cost order line contributes nothing and produces no line
        let err = build(&invoice(0, 0, 0), &[line("01", 5, 0)]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyPosting { .. }));
    }
}
