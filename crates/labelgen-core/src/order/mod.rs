//! Order document parsing.
//!
//! Text extracted from a supplier order is scanned line by line. The first
//! customer line names the customer; every line that matches an order-line
//! shape and names a catalog product becomes a [`ParsedItem`] with its
//! required label count.
//!
//! [`ParsedItem`]: crate::models::order::ParsedItem

mod customer;
mod line;
mod parser;
pub mod patterns;
pub mod quantity;

pub use customer::extract_customer;
pub use line::{interpret_line, match_line, LineMatch, LineOutcome};
pub use parser::TextOrderParser;
pub use quantity::{parse_quantity, required_labels};

use crate::models::catalog::Catalog;
use crate::models::order::OrderExtraction;

/// Trait for order document parsers.
pub trait OrderParser {
    /// Parse order text against a catalog snapshot. Per-line problems are
    /// reported in the returned diagnostics, never as an error.
    fn parse(&self, text: &str, catalog: &Catalog) -> OrderExtraction;
}
