//! # Input Validation
//!
//! Early validation of inbound payloads, before business logic runs and
//! before anything is sent to the remote API. A create call that would be
//! rejected remotely should fail here with a precise field error instead.

use crate::error::ValidationError;
use crate::types::NewDocumentPayload;

/// Maximum length accepted for the free-text document description.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum length of a PO reference the remote API will store.
const MAX_PO_LEN: usize = 50;

/// Validates a candidate new-document payload.
///
/// Checks: PO reference present and within remote limits, sold-to name
/// present, non-negative estimate, description length.
pub fn validate_new_document(payload: &NewDocumentPayload) -> Result<(), ValidationError> {
    if payload.po_number.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "po_number".to_string(),
        });
    }
    if payload.po_number.len() > MAX_PO_LEN {
        return Err(ValidationError::TooLong {
            field: "po_number".to_string(),
            max: MAX_PO_LEN,
        });
    }
    if payload.sold_to.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sold_to.name".to_string(),
        });
    }
    if payload.estimate_total.cents() < 0 {
        return Err(ValidationError::Negative {
            field: "estimate_total".to_string(),
        });
    }
    if let Some(description) = &payload.description {
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::Contact;

    fn payload() -> NewDocumentPayload {
        NewDocumentPayload {
            po_number: "AZ003463-0001".to_string(),
            sold_to: Contact {
                name: "J. Castellan".to_string(),
                ..Contact::default()
            },
            estimate_total: Money::from_cents(125000),
            contract_type: Default::default(),
            ad_source: Default::default(),
            description: None,
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_new_document(&payload()).is_ok());
    }

    #[test]
    fn test_po_number_required() {
        let mut p = payload();
        p.po_number = "   ".to_string();
        let err = validate_new_document(&p).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_sold_to_name_required() {
        let mut p = payload();
        p.sold_to.name = String::new();
        assert!(validate_new_document(&p).is_err());
    }

    #[test]
    fn test_negative_estimate_rejected() {
        let mut p = payload();
        p.estimate_total = Money::from_cents(-1);
        let err = validate_new_document(&p).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));
    }

    #[test]
    fn test_overlong_description_rejected() {
        let mut p = payload();
        p.description = Some("x".repeat(501));
        let err = validate_new_document(&p).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }
}
