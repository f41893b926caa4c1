//! Input validation: identifying fields and movement amounts.
//!
//! Everything here runs before a unit of work is opened, so a rejected
//! request never touches the store.

use crate::error::ValidationError;
use crate::record::ItemKey;

/// Maximum length of an item code, in characters.
pub const MAX_ITEM_CODE_LEN: usize = 50;

/// Maximum length of an item name, in characters.
pub const MAX_ITEM_NAME_LEN: usize = 80;

/// Maximum length of a lot number, in characters.
pub const MAX_LOT_NUMBER_LEN: usize = 50;

fn validate_field(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::FieldTooLong { field, max, len });
    }
    Ok(())
}

/// Validate the three identifying fields of a new record.
pub fn validate_item_key(key: &ItemKey) -> Result<(), ValidationError> {
    validate_field("item_code", &key.item_code, MAX_ITEM_CODE_LEN)?;
    validate_field("item_name", &key.item_name, MAX_ITEM_NAME_LEN)?;
    validate_field("lot_number", &key.lot_number, MAX_LOT_NUMBER_LEN)?;
    Ok(())
}

/// A movement amount must be strictly positive.
pub fn validate_amount(amount: i64) -> Result<i64, ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    Ok(amount)
}

/// Parse a movement amount from form text.
///
/// Surrounding whitespace is ignored; fractions, signs that yield a
/// non-positive value, and non-numeric text are rejected.
pub fn parse_amount(text: &str) -> Result<i64, ValidationError> {
    let amount: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(text.to_string()))?;
    validate_amount(amount).map_err(|_| ValidationError::InvalidAmount(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_regular_key() {
        assert!(validate_item_key(&ItemKey::new("A001", "Widget", "LOT1")).is_ok());
    }

    #[test]
    fn test_rejects_blank_fields() {
        let err = validate_item_key(&ItemKey::new("A001", "   ", "LOT1")).unwrap_err();
        assert_eq!(err, ValidationError::BlankField { field: "item_name" });

        let err = validate_item_key(&ItemKey::new("", "Widget", "LOT1")).unwrap_err();
        assert_eq!(err, ValidationError::BlankField { field: "item_code" });
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 80 multi-byte characters fit; 81 do not.
        let name: String = "品".repeat(MAX_ITEM_NAME_LEN);
        assert!(validate_item_key(&ItemKey::new("A001", name.clone(), "LOT1")).is_ok());

        let long = format!("{name}品");
        let err = validate_item_key(&ItemKey::new("A001", long, "LOT1")).unwrap_err();
        assert!(matches!(err, ValidationError::FieldTooLong { field: "item_name", len: 81, .. }));
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(1), Ok(1));
        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-3).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12 "), Ok(12));
        assert_eq!(parse_amount("+3"), Ok(3));
        for bad in ["", "0", "-1", "1.5", "ten", "1e3"] {
            assert_eq!(
                parse_amount(bad),
                Err(ValidationError::InvalidAmount(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
