//! Quantity parsing and label-count arithmetic.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::patterns::GRAM_SUFFIX;
use crate::models::order::Unit;

const GRAMS_PER_KILOGRAM: Decimal = Decimal::ONE_THOUSAND;

/// A parsed quantity token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity {
    /// Numeric value.
    pub value: Decimal,
    /// The token carried a gram suffix (`"500g"`).
    pub grams: bool,
}

/// Parse a quantity token with a decimal comma (`"2,5"`, `"10"`, `"500 g"`).
pub fn parse_quantity(token: &str) -> Result<Quantity, String> {
    let trimmed = token.trim();
    let without_suffix = GRAM_SUFFIX.replace(trimmed, "");
    let grams = without_suffix.len() != trimmed.len();

    let normalized = without_suffix.replace(',', ".");
    let normalized = normalized.trim_end_matches('.');
    if normalized.is_empty() {
        return Err(format!("invalid quantity '{}'", token));
    }

    let value = Decimal::from_str(normalized)
        .map_err(|e| format!("invalid quantity '{}': {}", token, e))?;
    Ok(Quantity { value, grams })
}

/// Number of labels needed for `quantity` of a product sold in packages of
/// `package_size`.
///
/// A zero package size means the product is not labelled. Kilogram
/// quantities are compared in grams. The result is always rounded up so a
/// partial last package still gets a label. Returns `None` when the count
/// does not fit in a `u32`.
pub fn required_labels(quantity: Decimal, unit: &Unit, package_size: Decimal) -> Option<u32> {
    if package_size.is_zero() {
        return Some(0);
    }

    let packages = match unit {
        Unit::Kg => {
            let quantity_g = quantity.checked_mul(GRAMS_PER_KILOGRAM)?;
            let package_g = package_size.checked_mul(GRAMS_PER_KILOGRAM)?;
            quantity_g.checked_div(package_g)?
        }
        _ => quantity.checked_div(package_size)?,
    };

    packages.ceil().max(Decimal::ZERO).to_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("2,5").unwrap().value, dec("2.5"));
        assert_eq!(parse_quantity("10").unwrap().value, dec("10"));
        assert_eq!(parse_quantity("2,").unwrap().value, dec("2"));
        assert!(!parse_quantity("10").unwrap().grams);
    }

    #[test]
    fn test_parse_quantity_gram_suffix() {
        let q = parse_quantity("500g").unwrap();
        assert_eq!(q.value, dec("500"));
        assert!(q.grams);

        let q = parse_quantity("250 G").unwrap();
        assert_eq!(q.value, dec("250"));
        assert!(q.grams);
    }

    #[test]
    fn test_parse_quantity_invalid() {
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("g").is_err());
        assert!(parse_quantity("99999999999999999999999999999999").is_err());
    }

    #[test]
    fn test_units_ceiling() {
        assert_eq!(required_labels(dec("10"), &Unit::Un, dec("5")), Some(2));
        assert_eq!(required_labels(dec("11"), &Unit::Un, dec("5")), Some(3));
        assert_eq!(required_labels(dec("1"), &Unit::Un, dec("12")), Some(1));
        assert_eq!(required_labels(dec("300"), &Unit::G, dec("250")), Some(2));
        assert_eq!(required_labels(dec("3"), &Unit::Unspecified, dec("2")), Some(2));
    }

    #[test]
    fn test_kilograms_match_unconverted_ratio() {
        assert_eq!(required_labels(dec("2.5"), &Unit::Kg, dec("0.5")), Some(5));
        assert_eq!(required_labels(dec("2.6"), &Unit::Kg, dec("0.5")), Some(6));
        assert_eq!(required_labels(dec("0.3"), &Unit::Kg, dec("0.1")), Some(3));
    }

    #[test]
    fn test_zero_package_size() {
        assert_eq!(required_labels(dec("10"), &Unit::Un, Decimal::ZERO), Some(0));
        assert_eq!(required_labels(Decimal::ZERO, &Unit::Kg, Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_zero_quantity() {
        assert_eq!(required_labels(Decimal::ZERO, &Unit::Un, dec("5")), Some(0));
    }

    #[test]
    fn test_count_overflow() {
        assert_eq!(
            required_labels(dec("100000000000"), &Unit::Un, dec("1")),
            None
        );
    }

    #[test]
    fn test_deterministic() {
        let first = required_labels(dec("7.25"), &Unit::Kg, dec("0.4"));
        let second = required_labels(dec("7.25"), &Unit::Kg, dec("0.4"));
        assert_eq!(first, second);
        assert_eq!(first, Some(19));
    }
}
