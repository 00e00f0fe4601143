//! WASM bindings for order label generation.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use labelgen_core::models::config::LabelConfig;
use labelgen_core::order::{parse_quantity, required_labels as count_labels};
use labelgen_core::{Catalog, LabelRenderer, OrderParser, TextOrderParser, Unit};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(date: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(date.trim(), "%d/%m/%Y")
        .map_err(|e| js_error(format!("invalid production date '{}': {}", date, e)))
}

/// Parse order text against a catalog given as a JSON array of product rows.
///
/// Returns the customer, items, and diagnostics.
#[wasm_bindgen]
pub fn parse_order(text: &str, catalog_json: &str) -> Result<JsValue, JsValue> {
    let catalog = Catalog::from_json(catalog_json).map_err(js_error)?;
    let extraction = TextOrderParser::new().parse(text, &catalog);

    serde_wasm_bindgen::to_value(&extraction).map_err(js_error)
}

/// Parse a package size (`"0,5"`). Negative sizes are rejected, as in the catalog.
fn parse_package_size(value: &str) -> Result<Decimal, JsValue> {
    let size = Decimal::from_str(&value.trim().replace(',', "."))
        .map_err(|e| js_error(format!("invalid package size '{}': {}", value, e)))?;
    if size.is_sign_negative() && !size.is_zero() {
        return Err(js_error(format!("package size must not be negative: {}", value)));
    }
    Ok(size)
}

/// Labels needed for a quantity (`"2,5"`) in packages of `package_size`.
#[wasm_bindgen]
pub fn required_labels(
    quantity: &str,
    unit: Option<String>,
    package_size: &str,
) -> Result<u32, JsValue> {
    let quantity = parse_quantity(quantity).map_err(js_error)?;
    let package_size = parse_package_size(package_size)?;
    let unit = match Unit::from_token(unit.as_deref()) {
        Unit::Unspecified if quantity.grams => Unit::G,
        unit => unit,
    };

    count_labels(quantity.value, &unit, package_size)
        .ok_or_else(|| js_error("label count out of range"))
}

/// Normalize a unit token (`"und"` → `"UN"`, `"kg"` → `"KG"`).
#[wasm_bindgen]
pub fn normalize_unit(token: Option<String>) -> Option<String> {
    Unit::from_token(token.as_deref()).as_str().map(str::to_string)
}

/// Render the merged labels PDF for an order. `date` is DD/MM/YYYY.
#[wasm_bindgen]
pub fn render_labels(text: &str, catalog_json: &str, date: &str) -> Result<Vec<u8>, JsValue> {
    LabelGenerator::new(catalog_json)?.render(text, date)
}

/// Label generator holding a catalog snapshot, for repeated use.
#[wasm_bindgen]
pub struct LabelGenerator {
    catalog: Catalog,
    config: LabelConfig,
}

#[wasm_bindgen]
impl LabelGenerator {
    /// Create a generator from a JSON array of product rows.
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str) -> Result<LabelGenerator, JsValue> {
        Ok(Self {
            catalog: Catalog::from_json(catalog_json).map_err(js_error)?,
            config: LabelConfig::default(),
        })
    }

    /// Apply a JSON configuration (same format as the CLI config file).
    #[wasm_bindgen]
    pub fn configure(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.config = serde_json::from_str(config_json).map_err(js_error)?;
        Ok(())
    }

    /// Number of products in the catalog.
    #[wasm_bindgen(getter)]
    pub fn product_count(&self) -> usize {
        self.catalog.len()
    }

    /// Parse order text.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        let extraction = TextOrderParser::from_config(&self.config.extraction).parse(text, &self.catalog);
        serde_wasm_bindgen::to_value(&extraction).map_err(js_error)
    }

    /// Render the merged labels PDF for an order.
    #[wasm_bindgen]
    pub fn render(&self, text: &str, date: &str) -> Result<Vec<u8>, JsValue> {
        let date = parse_date(date)?;
        let extraction = TextOrderParser::from_config(&self.config.extraction).parse(text, &self.catalog);

        let rendered = LabelRenderer::new(self.config.label.clone())
            .render(&extraction, &self.catalog, date)
            .map_err(js_error)?;
        Ok(rendered.bytes)
    }

    /// Suggested file name for an order's labels.
    #[wasm_bindgen]
    pub fn file_name(&self, text: &str) -> String {
        let extraction = TextOrderParser::from_config(&self.config.extraction).parse(text, &self.catalog);
        self.config.labels_file_name(extraction.customer.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const CATALOG: &str = r#"[{"id": 7, "produto": "Bread", "produtopacote": 0.5}]"#;
    const ORDER: &str = "Cliente: Padaria Central\n7 Bread 2,5 KG R$ 10,00 ----- R$ 25,00\n";

    #[wasm_bindgen_test]
    fn test_required_labels() {
        assert_eq!(required_labels("10", Some("UN".to_string()), "5").unwrap(), 2);
        assert_eq!(required_labels("2,5", Some("kg".to_string()), "0,5").unwrap(), 5);
        assert_eq!(required_labels("4", None, "0").unwrap(), 0);
    }

    #[wasm_bindgen_test]
    fn test_required_labels_rejects_bad_package_size() {
        assert!(required_labels("1", None, "-1").is_err());
        assert!(required_labels("1", None, "500g").is_err());
    }

    #[wasm_bindgen_test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit(Some("und".to_string())).as_deref(), Some("UN"));
        assert_eq!(normalize_unit(Some("Kg".to_string())).as_deref(), Some("KG"));
        assert_eq!(normalize_unit(Some("cx".to_string())).as_deref(), Some("cx"));
        assert_eq!(normalize_unit(None), None);
    }

    #[wasm_bindgen_test]
    fn test_render_labels() {
        let bytes = render_labels(ORDER, CATALOG, "12/03/2024").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[wasm_bindgen_test]
    fn test_file_name() {
        let generator = LabelGenerator::new(CATALOG).unwrap();
        assert_eq!(generator.product_count(), 1);
        assert_eq!(generator.file_name(ORDER), "Padaria_Central_etiquetas.pdf");
    }
}
