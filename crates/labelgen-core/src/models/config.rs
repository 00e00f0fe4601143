//! Configuration structures for the label pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the labelgen pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Order extraction configuration.
    pub extraction: ExtractionConfig,

    /// Label layout configuration.
    pub label: LayoutConfig,

    /// Product catalog source.
    pub catalog: CatalogConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum extracted text length to treat a PDF as having a text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 20 }
    }
}

/// Order extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Marker that identifies the customer line.
    pub customer_marker: String,

    /// Prefix for products without a catalog name (`"{prefix} {id}"`).
    pub fallback_name_prefix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            customer_marker: "Cliente:".to_string(),
            fallback_name_prefix: "Product".to_string(),
        }
    }
}

/// Label page layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Label width in centimetres.
    pub page_width_cm: f32,

    /// Label height in centimetres.
    pub page_height_cm: f32,

    /// Characters per description line (the body is printed on two lines).
    pub description_line_width: usize,

    /// Description body that means "see package"; selects the compact layout.
    pub package_info_marker: String,

    /// Printed instead of a validity text that has no digits.
    pub daily_consumption_notice: String,

    /// Manufacturer line printed at the bottom of detailed labels.
    pub manufacturer_notice: String,

    /// Manufacturer line printed at the bottom of compact labels.
    pub compact_manufacturer_notice: String,

    /// chrono format of the production date.
    pub date_format: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width_cm: 9.8,
            page_height_cm: 2.5,
            description_line_width: 90,
            package_info_marker: "Informações na Embalagem".to_string(),
            daily_consumption_notice: "Consumo Diário.".to_string(),
            manufacturer_notice:
                "Fabricado por: Baxter Indústria de Alimentos LTDA CNPJ: 00.558.662/000-81"
                    .to_string(),
            compact_manufacturer_notice:
                "Fabricado por Baxter Indústria de Alimentos Ltda CNPJ: 00.558.662/000-81"
                    .to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Page width in PDF points.
    pub fn page_width_pt(&self) -> f32 {
        self.page_width_cm / 2.54 * 72.0
    }

    /// Page height in PDF points.
    pub fn page_height_pt(&self) -> f32 {
        self.page_height_cm / 2.54 * 72.0
    }
}

/// Product catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Local catalog file (`.json` or `.csv`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Base URL of the hosted database (REST endpoint at `{url}/rest/v1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Product table name.
    pub table: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: None,
            table: "produtos".to_string(),
            api_key_env: "SUPABASE_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for merged label PDFs.
    pub output_dir: PathBuf,

    /// Used in file names when no customer was identified.
    pub missing_customer_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("pedidos_combinados"),
            missing_customer_name: "sem_cliente".to_string(),
        }
    }
}

impl LabelConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Merged labels file name for a customer.
    pub fn labels_file_name(&self, customer: Option<&str>) -> String {
        let customer = customer
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.output.missing_customer_name);
        format!("{}_etiquetas.pdf", customer.trim())
            .replace('/', "-")
            .replace(' ', "_")
    }
}
