//! Product catalog snapshot.
//!
//! The catalog is loaded once per invocation from the hosted product table
//! (or a local export of it) and is read-only afterwards.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::CatalogError;

/// A product row from the hosted product table.
///
/// Field aliases accept the column names used by the hosted table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: u64,

    /// Display name printed as the label title.
    #[serde(alias = "produto")]
    pub name: String,

    /// Quantity contained in one package (label count divisor).
    #[serde(alias = "produtopacote", default, deserialize_with = "zero_if_null")]
    pub package_size: Decimal,

    /// Ingredient list.
    #[serde(alias = "ingredientes", default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,

    /// Shelf life in days after the production date.
    #[serde(alias = "prazovalidade", default, skip_serializing_if = "Option::is_none")]
    pub shelf_life_days: Option<u32>,

    /// Full label description: `heading: body. validity`.
    #[serde(alias = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Create a product with just the fields the label count needs.
    pub fn new(id: u64, name: impl Into<String>, package_size: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            package_size,
            ingredients: None,
            shelf_life_days: None,
            description: None,
        }
    }

    /// Set the ingredient list.
    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = Some(ingredients.into());
        self
    }

    /// Set the shelf life in days.
    pub fn with_shelf_life(mut self, days: u32) -> Self {
        self.shelf_life_days = Some(days);
        self
    }

    /// Set the label description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Text printed under the title of this product's labels.
    ///
    /// Falls back to a description composed from ingredients and shelf life,
    /// then to the product name.
    pub fn label_description(&self) -> String {
        if let Some(description) = self.description.as_deref().map(str::trim) {
            if !description.is_empty() {
                return description.to_string();
            }
        }

        match (self.ingredients.as_deref().map(str::trim), self.shelf_life_days) {
            (Some(ingredients), Some(days)) if !ingredients.is_empty() => format!(
                "Ingredientes: {}. Válido {} dia(s) após a data de fabricação.",
                ingredients.trim_end_matches('.'),
                days
            ),
            (Some(ingredients), None) if !ingredients.is_empty() => {
                format!("Ingredientes: {}.", ingredients.trim_end_matches('.'))
            }
            _ => self.name.clone(),
        }
    }
}

/// Read-only snapshot of the product table, keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<u64, Product>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from product rows. Later rows replace earlier rows
    /// with the same id.
    pub fn from_products(
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        debug!("Catalog loaded with {} products", catalog.len());
        Ok(catalog)
    }

    /// Parse a JSON array of product rows.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let rows: Vec<Product> =
            serde_json::from_str(json).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Self::from_products(rows)
    }

    /// Add or replace a product.
    pub fn insert(&mut self, product: Product) -> Result<(), CatalogError> {
        if product.package_size.is_sign_negative() && !product.package_size.is_zero() {
            return Err(CatalogError::NegativePackageSize {
                id: product.id,
                value: product.package_size.to_string(),
            });
        }
        self.products.insert(product.id, product);
        Ok(())
    }

    /// Look up a product by id.
    pub fn get(&self, id: u64) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Package size for a product id.
    pub fn package_size(&self, id: u64) -> Option<Decimal> {
        self.products.get(&id).map(|p| p.package_size)
    }

    /// Display name for a product id.
    pub fn name(&self, id: u64) -> Option<&str> {
        self.products.get(&id).map(|p| p.name.as_str())
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}
