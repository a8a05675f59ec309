//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! normalization so every operation enforces the same rules.

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, Volume};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim a required name and reject empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Fuel types are compared case-insensitively, so they are stored lowercase.
pub(crate) fn normalize_fuel_type(value: &str) -> ResultEngine<String> {
    normalize_required_name(value, "fuel type").map(|name| name.to_lowercase())
}

pub(crate) fn require_positive_amount(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation(format!(
            "{label} amount must be > 0"
        )));
    }
    Ok(())
}

pub(crate) fn require_positive_volume(volume: Volume, label: &str) -> ResultEngine<()> {
    if volume <= Volume::ZERO {
        return Err(EngineError::Validation(format!(
            "{label} quantity must be > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuel_types_are_trimmed_and_lowercased() {
        assert_eq!(normalize_fuel_type("  Petrol ").unwrap(), "petrol");
        assert!(normalize_fuel_type("   ").is_err());
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" tea ")), Some("tea".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn amounts_must_be_positive() {
        assert!(require_positive_amount(Money::new(1), "expense").is_ok());
        assert_eq!(
            require_positive_amount(Money::ZERO, "expense"),
            Err(EngineError::Validation("expense amount must be > 0".to_string()))
        );
    }
}
