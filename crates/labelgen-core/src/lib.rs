//! Core library for order label generation.
//!
//! This crate provides:
//! - PDF processing (text extraction from supplier order documents)
//! - Order parsing: customer name, order lines, unit normalization
//! - Required label counts from a product catalog snapshot
//! - Label layout and rendering into a single merged PDF

pub mod error;
pub mod models;
pub mod pdf;
pub mod order;
pub mod label;

pub use error::{LabelError, Result};
pub use models::catalog::{Catalog, Product};
pub use models::order::{Diagnostic, DiagnosticKind, OrderExtraction, ParsedItem, Unit};
pub use models::config::LabelConfig;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use order::{OrderParser, TextOrderParser};
pub use label::{LabelRenderer, RenderedLabels};
