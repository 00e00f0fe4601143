//! Error types for the labelgen-core library.

use thiserror::Error;

/// Main error type for the labelgen library.
#[derive(Error, Debug)]
pub enum LabelError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Product catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Label rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF has no usable text layer.
    #[error("PDF has no text layer ({0} characters extracted)")]
    NoText(usize),
}

/// Errors related to the product catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A product row could not be decoded.
    #[error("invalid product row: {0}")]
    Decode(String),

    /// Package sizes must not be negative.
    #[error("product {id} has a negative package size: {value}")]
    NegativePackageSize { id: u64, value: String },

    /// The catalog source returned an error.
    #[error("catalog source failed: {0}")]
    Source(String),
}

/// Errors related to label rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The order produced no labels to print.
    #[error("order has no labels to print")]
    NoLabels,

    /// Building or writing the PDF failed.
    #[error("failed to write PDF: {0}")]
    Write(String),
}

/// Result type for the labelgen library.
pub type Result<T> = std::result::Result<T, LabelError>;
