//! Order text parser: customer extraction plus per-line interpretation.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::customer::extract_customer;
use super::line::{interpret_line, LineOutcome};
use super::OrderParser;
use crate::models::catalog::Catalog;
use crate::models::config::ExtractionConfig;
use crate::models::order::{Diagnostic, OrderExtraction};

/// Parser for the text layer of supplier order documents.
#[derive(Debug, Clone)]
pub struct TextOrderParser {
    /// Marker that identifies the customer line.
    customer_marker: String,
    /// Prefix for products without a catalog name.
    fallback_name_prefix: String,
}

impl TextOrderParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            customer_marker: config.customer_marker.clone(),
            fallback_name_prefix: config.fallback_name_prefix.clone(),
        }
    }

    /// Set the customer line marker.
    pub fn with_customer_marker(mut self, marker: impl Into<String>) -> Self {
        self.customer_marker = marker.into();
        self
    }

    /// Set the prefix used for unnamed products.
    pub fn with_fallback_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fallback_name_prefix = prefix.into();
        self
    }
}

impl Default for TextOrderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderParser for TextOrderParser {
    fn parse(&self, text: &str, catalog: &Catalog) -> OrderExtraction {
        let start = Instant::now();
        info!(
            "Parsing order from {} characters of text against {} products",
            text.len(),
            catalog.len()
        );

        let customer = extract_customer(text, &self.customer_marker);
        match &customer {
            Some(name) => debug!("Customer identified: {}", name),
            None => warn!("No customer line found (marker {:?})", self.customer_marker),
        }

        let mut extraction = OrderExtraction {
            customer,
            ..Default::default()
        };

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            extraction.lines_scanned += 1;

            match interpret_line(line, line_number, catalog, &self.fallback_name_prefix) {
                LineOutcome::Item(item) => {
                    debug!(
                        "Line {}: product {} x {} {} -> {} labels",
                        line_number, item.id, item.quantity, item.unit, item.labels
                    );
                    extraction.items.push(item);
                }
                LineOutcome::Skipped => {
                    if line.chars().any(|c| c.is_ascii_digit()) {
                        debug!("Line {} not processed: {}", line_number, line.trim());
                        extraction.lines_skipped += 1;
                    }
                }
                LineOutcome::Problem(kind) => {
                    let diagnostic = Diagnostic::new(line_number, line, kind);
                    warn!("{}", diagnostic);
                    extraction.diagnostics.push(diagnostic);
                }
            }
        }

        debug!(
            "Parsed {} items ({} labels) from {} lines in {:?}",
            extraction.items.len(),
            extraction.total_labels(),
            extraction.lines_scanned,
            start.elapsed()
        );

        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Product;
    use crate::models::order::Unit;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const ORDER: &str = r#"DISTRIBUIDORA EXEMPLO
Pedido Nº 4521          Data: 12/03/2024
Cliente: Padaria Central
Cód  Produto                 Qtd   Un   Preço        Total
7 Bread 2,5 KG R$ 10,00 ----- R$ 25,00
12 Cookies 13 UN R$ 2,00 ----- R$ 26,00
99 Pie 1 UN R$ 9,00 ----- R$ 9,00
7 Bread 1 KG R$ 10,00 ----- R$ 10,00
3 2 un R$ 0,00 ----- R$ 0,00
Total do pedido: R$ 70,00
Cliente: Outro Nome
Thank you for your order"#;

    fn catalog() -> Catalog {
        Catalog::from_products([
            Product::new(7, "Bread", Decimal::from_str("0.5").unwrap()),
            Product::new(12, "Cookies", Decimal::from(6)),
            Product::new(3, "Sample", Decimal::ZERO),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_order() {
        let extraction = TextOrderParser::new().parse(ORDER, &catalog());

        assert_eq!(extraction.customer.as_deref(), Some("Padaria Central"));
        assert_eq!(extraction.lines_scanned, 12);

        let summary: Vec<(u64, u32)> = extraction
            .items
            .iter()
            .map(|item| (item.id, item.labels))
            .collect();
        assert_eq!(summary, vec![(7, 5), (12, 3), (7, 2), (3, 0)]);
        assert_eq!(extraction.total_labels(), 10);

        assert_eq!(extraction.items[3].unit, Unit::Un);
        assert_eq!(extraction.items[3].name, "Sample");
    }

    #[test]
    fn test_unknown_product_reported() {
        let extraction = TextOrderParser::new().parse(ORDER, &catalog());

        assert_eq!(extraction.unknown_products(), vec![99]);
        assert_eq!(extraction.diagnostics.len(), 1);
        assert_eq!(extraction.diagnostics[0].line_number, 7);
        assert!(extraction.items.len() < extraction.lines_scanned);
    }

    #[test]
    fn test_skipped_lines_counted() {
        let extraction = TextOrderParser::new().parse(ORDER, &catalog());
        // Order number and order total lines
        assert_eq!(extraction.lines_skipped, 2);
    }

    #[test]
    fn test_source_order_kept() {
        let extraction = TextOrderParser::new().parse(ORDER, &catalog());
        let lines: Vec<usize> = extraction.items.iter().map(|i| i.line_number).collect();
        assert_eq!(lines, vec![5, 6, 8, 9]);
    }

    #[test]
    fn test_custom_marker() {
        let text = "Customer: Corner Shop\n7 Bread 1 KG R$ 1,00 ----- R$ 1,00";
        let extraction = TextOrderParser::new()
            .with_customer_marker("Customer:")
            .parse(text, &catalog());
        assert_eq!(extraction.customer.as_deref(), Some("Corner Shop"));
        assert_eq!(extraction.items.len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let extraction = TextOrderParser::new().parse("", &catalog());
        assert_eq!(extraction, OrderExtraction::default());
    }

    #[test]
    fn test_parse_is_repeatable() {
        let parser = TextOrderParser::new();
        assert_eq!(parser.parse(ORDER, &catalog()), parser.parse(ORDER, &catalog()));
    }
}
