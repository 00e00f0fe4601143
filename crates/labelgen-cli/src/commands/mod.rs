//! Subcommand implementations.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod process;

use std::path::Path;

use labelgen_core::LabelConfig;

/// Load the configuration from `--config`, the default config file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LabelConfig> {
    if let Some(path) = config_path {
        return Ok(LabelConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(LabelConfig::from_file(&default_path)?)
    } else {
        Ok(LabelConfig::default())
    }
}

/// Read order text from a PDF or a plain text file.
pub fn read_order_text(path: &Path, config: &LabelConfig) -> anyhow::Result<String> {
    use labelgen_core::{PdfExtractor, PdfProcessor};

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let data = std::fs::read(path)?;
            let mut extractor = PdfExtractor::new();
            extractor.load(&data)?;
            let content = extractor.extract_content(config.pdf.min_text_length)?;
            Ok(content.text)
        }
        "txt" => Ok(std::fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Whether a path has an extension the order reader accepts.
pub fn is_order_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
}
