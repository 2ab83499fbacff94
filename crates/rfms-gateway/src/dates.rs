//! # Boundary Date Conversion
//!
//! The remote API is inconsistent about date formats:
//!
//! - search / date-range calls and the inventory passthrough require
//!   `MM-DD-YYYY`
//! - the AP endpoint requires `M/D/YY` (no zero padding)
//! - everything internal stays ISO `YYYY-MM-DD`
//!
//! All conversions happen here, at the gateway boundary - never inside the
//! matching or reconciliation logic.

use chrono::NaiveDate;

use rfms_core::reconcile::parse_flexible_date;

/// `MM-DD-YYYY`, for search and date-range calls.
pub fn to_search_format(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

/// `M/D/YY` with no zero padding, for the AP endpoint.
pub fn to_payable_format(date: NaiveDate) -> String {
    date.format("%-m/%-d/%y").to_string()
}

/// Parses a raw captured date string (any accepted inbound format) and
/// renders it for the AP endpoint. `None` when the raw string is
/// unparseable; the caller decides whether the field is mandatory.
pub fn payable_date_from_raw(raw: &str) -> Option<String> {
    parse_flexible_date(raw).map(to_payable_format)
}

/// Parses a raw captured date string and renders it for search calls.
pub fn search_date_from_raw(raw: &str) -> Option<String> {
    parse_flexible_date(raw).map(to_search_format)
}
