//! # Canonical Identifiers
//!
//! Normalizes free-form order/PO/QR numbers into a canonical
//! {prefix, base, suffix} decomposition and produces the spelling
//! variations used for remote search.
//!
//! ## Spelling Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The same document arrives spelled many ways:                           │
//! │                                                                         │
//! │    "AZ003463-0001"   hyphenated (full)                                  │
//! │    "AZ0034630001"    concatenated (joined)                              │
//! │    "PO: AZ003463"    labelled parent reference                          │
//! │    "#ST12345"        ST sub-format, 5-digit body, literal # marker      │
//! │    "784512"          bare numeric legacy reference                      │
//! │                                                                         │
//! │  The remote store is not guaranteed to index all spellings              │
//! │  identically, so search is driven by ALL variations.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invariant: `full` and `joined` always reduce to the same decomposition
//! when re-normalized (round-trip stability). Strings that match no known
//! pattern are returned uppercased with all components `None` and logged as
//! a normalization miss, never silently coerced into a partial match.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

/// Leading reference labels stripped before classification ("Ref:", "PO:",
/// "Order #", ...). The label must be followed by punctuation or
/// whitespace so that real prefixes ("QR104599") and the `#ST` marker pass
/// through untouched.
static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:ref(?:erence)?|p\.?o\.?|order|qr)(?:\s*[:#]\s*|\s+)").unwrap()
});

/// ST sub-format: 5-digit body, optional literal `#` marker.
static ST_FORMAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#?)ST(\d{5})$").unwrap());

/// General format: 2-3 letter prefix, 6-digit body, optional 4-digit
/// sub-document suffix joined with or without a hyphen.
static GENERAL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,3})(\d{6})(?:-?(\d{4}))?$").unwrap());

/// Bare numeric legacy reference.
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

// =============================================================================
// CanonicalIdentifier
// =============================================================================

/// The canonical decomposition of an order/PO/QR number.
///
/// ## Component Meanings
/// - `prefix`: 2-3 letter document class ("AZ" order, "AQ" quote, "ST" stock)
/// - `base`: fixed-width numeric body (6 digits; 5 for the ST sub-format)
/// - `suffix`: optional 4-digit sub-document number
/// - `full`: canonical spelling with separator (`AZ003463-0001`)
/// - `joined`: canonical spelling without separator (`AZ0034630001`)
///
/// A normalization miss keeps the uppercased raw string in `full`/`joined`
/// with all three components `None` (a degraded identifier; still usable
/// as a literal search term).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
    pub prefix: Option<String>,
    pub base: Option<String>,
    pub suffix: Option<String>,
    pub full: String,
    pub joined: String,
}

impl CanonicalIdentifier {
    /// Normalizes a free-form reference string.
    ///
    /// Algorithm: strip a leading reference label and whitespace, uppercase,
    /// then classify by pattern (ST sub-format first, then the general
    /// prefix format, then bare numeric). Unparseable strings become a
    /// degraded identifier and are logged as a normalization miss.
    pub fn normalize(raw: &str) -> Self {
        let stripped = LABEL.replace(raw.trim(), "");
        let cleaned: String = stripped
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if let Some(caps) = ST_FORMAT.captures(&cleaned) {
            // ST keeps its literal # marker; there is no separator concept,
            // so full and joined are the same spelling.
            let marker = &caps[1];
            let base = caps[2].to_string();
            let spelling = format!("{}ST{}", marker, base);
            return CanonicalIdentifier {
                prefix: Some("ST".to_string()),
                base: Some(base),
                suffix: None,
                full: spelling.clone(),
                joined: spelling,
            };
        }

        if let Some(caps) = GENERAL_FORMAT.captures(&cleaned) {
            let prefix = caps[1].to_string();
            let base = caps[2].to_string();
            let suffix = caps.get(3).map(|m| m.as_str().to_string());
            let (full, joined) = match &suffix {
                Some(s) => (
                    format!("{}{}-{}", prefix, base, s),
                    format!("{}{}{}", prefix, base, s),
                ),
                None => {
                    let spelling = format!("{}{}", prefix, base);
                    (spelling.clone(), spelling)
                }
            };
            return CanonicalIdentifier {
                prefix: Some(prefix),
                base: Some(base),
                suffix,
                full,
                joined,
            };
        }

        if NUMERIC.is_match(&cleaned) && !cleaned.is_empty() {
            // Some legacy documents use bare numeric references
            return CanonicalIdentifier {
                prefix: None,
                base: Some(cleaned.clone()),
                suffix: None,
                full: cleaned.clone(),
                joined: cleaned,
            };
        }

        warn!(raw = %raw, "order reference matched no known pattern, using degraded identifier");
        CanonicalIdentifier {
            prefix: None,
            base: None,
            suffix: None,
            full: cleaned.clone(),
            joined: cleaned,
        }
    }

    /// True if this identifier matched no known pattern (degraded).
    pub fn is_miss(&self) -> bool {
        self.prefix.is_none() && self.base.is_none()
    }

    /// The set of spellings {full, joined, base}, deduplicated, used to
    /// drive multi-query search against the remote system.
    pub fn variations(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(3);
        for candidate in [Some(&self.full), Some(&self.joined), self.base.as_ref()]
            .into_iter()
            .flatten()
        {
            if !candidate.is_empty() && !out.iter().any(|v| v == candidate) {
                out.push(candidate.clone());
            }
        }
        out
    }

    /// The parent identifier: the same prefix+base with the 4-digit
    /// sub-document suffix stripped.
    ///
    /// Identifiers without a suffix are their own base document and have no
    /// parent; nothing further is stripped (a two-segment reference like
    /// `P1BW-1828` must not lose its tail).
    pub fn parent(&self) -> Option<CanonicalIdentifier> {
        self.suffix.as_ref()?;
        let prefix = self.prefix.as_ref()?;
        let base = self.base.as_ref()?;
        Some(CanonicalIdentifier::normalize(&format!("{}{}", prefix, base)))
    }

    /// Canonical equality: the two references name the same document.
    ///
    /// Parsed identifiers compare by {prefix, base, suffix} so separator
    /// style never matters. Degraded identifiers compare by literal
    /// spelling only; two distinct unparseable strings are never equal.
    pub fn same_document(&self, other: &CanonicalIdentifier) -> bool {
        if self.is_miss() || other.is_miss() {
            return self.full == other.full;
        }
        self.prefix == other.prefix && self.base == other.base && self.suffix == other.suffix
    }

    /// True if both identifiers share the same prefix+base (ignoring any
    /// suffix). This is the relation used for billing-group parent matching.
    pub fn same_root(&self, other: &CanonicalIdentifier) -> bool {
        match (&self.prefix, &self.base, &other.prefix, &other.base) {
            (Some(p1), Some(b1), Some(p2), Some(b2)) => p1 == p2 && b1 == b2,
            _ => false,
        }
    }
}

impl fmt::Display for CanonicalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
