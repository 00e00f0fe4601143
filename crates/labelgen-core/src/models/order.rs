//! Order data models: parsed order items and per-line diagnostics.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit of measure of an ordered quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Unit {
    /// Units/pieces (UN, UND, U).
    Un,
    /// Kilograms.
    Kg,
    /// Grams.
    G,
    /// Any other token, kept as written.
    Other(String),
    /// No unit token on the line.
    Unspecified,
}

impl Unit {
    /// Normalize a unit token. Matching is case-insensitive; unknown tokens
    /// pass through unmodified.
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(raw) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Unit::Unspecified;
        };

        match raw.to_uppercase().as_str() {
            "UND" | "UN" | "U" => Unit::Un,
            "KG" => Unit::Kg,
            "G" => Unit::G,
            _ => Unit::Other(raw.to_string()),
        }
    }

    /// Canonical token, `None` when unspecified.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Unit::Un => Some("UN"),
            Unit::Kg => Some("KG"),
            Unit::G => Some("G"),
            Unit::Other(token) => Some(token),
            Unit::Unspecified => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(""))
    }
}

impl From<Option<String>> for Unit {
    fn from(token: Option<String>) -> Self {
        Unit::from_token(token.as_deref())
    }
}

impl From<Unit> for Option<String> {
    fn from(unit: Unit) -> Self {
        unit.as_str().map(str::to_string)
    }
}

/// One order line that was recognized and matched against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    /// Product id (canonical, no leading zeros).
    pub id: u64,

    /// Display name from the catalog.
    pub name: String,

    /// Ordered quantity.
    pub quantity: Decimal,

    /// Unit of the ordered quantity.
    pub unit: Unit,

    /// Number of labels to print for this line.
    pub labels: u32,

    /// 1-based line number in the source text.
    pub line_number: usize,
}

/// What went wrong with a single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The line names a product id that is not in the catalog.
    UnknownProduct { id: u64 },

    /// The line looks like an order line but a value could not be parsed.
    Malformed { reason: String },
}

/// A per-line problem reported alongside the parsed items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line number in the source text.
    pub line_number: usize,

    /// The offending line, trimmed.
    pub line: String,

    /// Problem details.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line_number: usize, line: &str, kind: DiagnosticKind) -> Self {
        Self {
            line_number,
            line: line.trim().to_string(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnknownProduct { id } => write!(
                f,
                "line {}: product not found in catalog: {}",
                self.line_number, id
            ),
            DiagnosticKind::Malformed { reason } => write!(
                f,
                "line {}: could not process order line ({}): {}",
                self.line_number, reason, self.line
            ),
        }
    }
}

/// Result of parsing one order document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderExtraction {
    /// Customer name, if a customer line was found.
    pub customer: Option<String>,

    /// Order items in source order. Repeated products are not merged.
    pub items: Vec<ParsedItem>,

    /// Per-line problems.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,

    /// Number of lines examined.
    pub lines_scanned: usize,

    /// Lines that contained digits but did not look like order lines.
    pub lines_skipped: usize,
}

impl OrderExtraction {
    /// Total labels across all items.
    pub fn total_labels(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.labels)).sum()
    }

    /// Ids of products missing from the catalog, in order of appearance.
    pub fn unknown_products(&self) -> Vec<u64> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d.kind {
                DiagnosticKind::UnknownProduct { id } => Some(id),
                DiagnosticKind::Malformed { .. } => None,
            })
            .collect()
    }

    /// User-facing warnings: missing customer first, then per-line problems.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::with_capacity(self.diagnostics.len() + 1);
        if self.customer.is_none() {
            warnings.push("No customer identified in the order".to_string());
        }
        warnings.extend(self.diagnostics.iter().map(|d| d.to_string()));
        warnings
    }
}
