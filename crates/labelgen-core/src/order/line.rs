//! Single order line interpretation.

use tracing::trace;

use super::patterns::{NAMED_ORDER_LINE, UNNAMED_ORDER_LINE};
use super::quantity::{parse_quantity, required_labels};
use crate::models::catalog::Catalog;
use crate::models::order::{DiagnosticKind, ParsedItem, Unit};

/// Shape of an order line, tried in order: named first, then unnamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch<'a> {
    /// `id name quantity [unit] R$ x ----- R$ y`
    Named {
        id: &'a str,
        name: &'a str,
        quantity: &'a str,
        unit: Option<&'a str>,
    },
    /// `id quantity unit R$ x ----- R$ y`
    Unnamed {
        id: &'a str,
        quantity: &'a str,
        unit: &'a str,
    },
    /// Not an order line.
    Unmatched,
}

/// Classify a line by its order-line shape.
pub fn match_line(line: &str) -> LineMatch<'_> {
    if let Some(caps) = NAMED_ORDER_LINE.captures(line) {
        if let (Some(id), Some(name), Some(quantity)) =
            (caps.name("id"), caps.name("name"), caps.name("quantity"))
        {
            return LineMatch::Named {
                id: id.as_str(),
                name: name.as_str(),
                quantity: quantity.as_str(),
                unit: caps.name("unit").map(|m| m.as_str()),
            };
        }
    }

    if let Some(caps) = UNNAMED_ORDER_LINE.captures(line) {
        if let (Some(id), Some(quantity), Some(unit)) =
            (caps.name("id"), caps.name("quantity"), caps.name("unit"))
        {
            return LineMatch::Unnamed {
                id: id.as_str(),
                quantity: quantity.as_str(),
                unit: unit.as_str(),
            };
        }
    }

    LineMatch::Unmatched
}

/// Outcome of interpreting one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line is an order item for a catalog product.
    Item(ParsedItem),
    /// The line is not an order line.
    Skipped,
    /// The line looks like an order line but could not be used.
    Problem(DiagnosticKind),
}

/// Interpret one line against the catalog.
///
/// `fallback_prefix` names products whose catalog name is blank.
pub fn interpret_line(
    line: &str,
    line_number: usize,
    catalog: &Catalog,
    fallback_prefix: &str,
) -> LineOutcome {
    if !line.chars().any(|c| c.is_ascii_digit()) {
        return LineOutcome::Skipped;
    }

    let (id_token, quantity_token, unit_token) = match match_line(line) {
        LineMatch::Named {
            id, quantity, unit, ..
        } => (id, quantity, unit),
        LineMatch::Unnamed { id, quantity, unit } => (id, quantity, Some(unit)),
        LineMatch::Unmatched => {
            trace!("Line {} is not an order line", line_number);
            return LineOutcome::Skipped;
        }
    };

    let id: u64 = match id_token.parse() {
        Ok(id) => id,
        Err(e) => {
            return LineOutcome::Problem(DiagnosticKind::Malformed {
                reason: format!("invalid product id '{}': {}", id_token, e),
            });
        }
    };

    let quantity = match parse_quantity(quantity_token) {
        Ok(quantity) => quantity,
        Err(reason) => return LineOutcome::Problem(DiagnosticKind::Malformed { reason }),
    };

    let unit = match Unit::from_token(unit_token) {
        Unit::Unspecified if quantity.grams => Unit::G,
        unit => unit,
    };

    let Some(product) = catalog.get(id) else {
        return LineOutcome::Problem(DiagnosticKind::UnknownProduct { id });
    };

    let name = if product.name.trim().is_empty() {
        format!("{} {}", fallback_prefix, id)
    } else {
        product.name.clone()
    };

    let Some(labels) = required_labels(quantity.value, &unit, product.package_size) else {
        return LineOutcome::Problem(DiagnosticKind::Malformed {
            reason: format!(
                "label count out of range for {} {} in packages of {}",
                quantity.value, unit, product.package_size
            ),
        });
    };

    LineOutcome::Item(ParsedItem {
        id,
        name,
        quantity: quantity.value,
        unit,
        labels,
        line_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Product;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn catalog() -> Catalog {
        Catalog::from_products([
            Product::new(7, "Bread", Decimal::from_str("0.5").unwrap()),
            Product::new(3, "Sample", Decimal::ZERO),
            Product::new(12, "Cookies", Decimal::from(6)),
            Product::new(20, "", Decimal::ONE),
        ])
        .unwrap()
    }

    #[test]
    fn test_match_named() {
        assert_eq!(
            match_line("7 Bread 2,5 KG R$ 10,00 ----- R$ 25,00"),
            LineMatch::Named {
                id: "7",
                name: "Bread",
                quantity: "2,5",
                unit: Some("KG"),
            }
        );
    }

    #[test]
    fn test_match_unnamed() {
        assert_eq!(
            match_line("7 2,5 KG R$ 10,00 ----- R$ 25,00"),
            LineMatch::Unnamed {
                id: "7",
                quantity: "2,5",
                unit: "KG",
            }
        );
    }

    #[test]
    fn test_match_unmatched() {
        assert_eq!(match_line("Total: R$ 125,00"), LineMatch::Unmatched);
    }

    #[test]
    fn test_interpret_kilograms() {
        let outcome = interpret_line("7 Bread 2,5 KG R$ 10,00 ----- R$ 25,00", 1, &catalog(), "Product");
        assert_eq!(
            outcome,
            LineOutcome::Item(ParsedItem {
                id: 7,
                name: "Bread".to_string(),
                quantity: Decimal::from_str("2.5").unwrap(),
                unit: Unit::Kg,
                labels: 5,
                line_number: 1,
            })
        );
    }

    #[test]
    fn test_interpret_zero_package() {
        let LineOutcome::Item(item) =
            interpret_line("3 Sample 40 UN R$ 0,00 ----- R$ 0,00", 1, &catalog(), "Product")
        else {
            panic!("expected item");
        };
        assert_eq!(item.labels, 0);
    }

    #[test]
    fn test_interpret_strips_leading_zeros() {
        let LineOutcome::Item(item) =
            interpret_line("0012 Cookies 13 und R$ 2,00 ----- R$ 26,00", 1, &catalog(), "Product")
        else {
            panic!("expected item");
        };
        assert_eq!(item.id, 12);
        assert_eq!(item.unit, Unit::Un);
        assert_eq!(item.labels, 3);
    }

    #[test]
    fn test_interpret_missing_unit() {
        let LineOutcome::Item(item) =
            interpret_line("12 Cookies 12 R$ 2,00 ----- R$ 24,00", 1, &catalog(), "Product")
        else {
            panic!("expected item");
        };
        assert_eq!(item.unit, Unit::Unspecified);
        assert_eq!(item.labels, 2);
    }

    #[test]
    fn test_interpret_gram_suffix() {
        let LineOutcome::Item(item) =
            interpret_line("12 Cookies 500g R$ 2,00 ----- R$ 24,00", 1, &catalog(), "Product")
        else {
            panic!("expected item");
        };
        assert_eq!(item.unit, Unit::G);
        assert_eq!(item.quantity, Decimal::from(500));
    }

    #[test]
    fn test_interpret_unknown_product() {
        assert_eq!(
            interpret_line("99 Pie 1 UN R$ 1,00 ----- R$ 1,00", 1, &catalog(), "Product"),
            LineOutcome::Problem(DiagnosticKind::UnknownProduct { id: 99 })
        );
    }

    #[test]
    fn test_interpret_blank_name_uses_fallback() {
        let LineOutcome::Item(item) =
            interpret_line("20 Something 1 UN R$ 1,00 ----- R$ 1,00", 1, &catalog(), "Produto")
        else {
            panic!("expected item");
        };
        assert_eq!(item.name, "Produto 20");
    }

    #[test]
    fn test_interpret_oversized_id() {
        let outcome = interpret_line(
            "123456789012345678901234 Pie 1 UN R$ 1,00 ----- R$ 1,00",
            1,
            &catalog(),
            "Product",
        );
        assert!(matches!(
            outcome,
            LineOutcome::Problem(DiagnosticKind::Malformed { .. })
        ));
    }

    #[test]
    fn test_interpret_skips_text_lines() {
        assert_eq!(
            interpret_line("Thank you for your order", 1, &catalog(), "Product"),
            LineOutcome::Skipped
        );
        assert_eq!(
            interpret_line("Pedido 1234 - 01/02/2024", 1, &catalog(), "Product"),
            LineOutcome::Skipped
        );
    }
}
