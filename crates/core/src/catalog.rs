//! Read-only catalog snapshot types.
//!
//! The catalog is owned by the external store; the core only ever receives a
//! snapshot of it per call and never mutates it. Passing it explicitly keeps
//! matching a pure, cacheable function.

use serde::{Deserialize, Serialize};

use crate::id::ProductId;

/// One product row from a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    /// GTIN as stored on the product master, when known.
    pub barcode_gtin: Option<String>,
    pub category: String,
}

impl CatalogEntry {
    pub fn new(
        product_id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            sku: sku.into(),
            name: name.into(),
            barcode_gtin: None,
            category: category.into(),
        }
    }

    pub fn with_barcode(mut self, gtin: impl Into<String>) -> Self {
        self.barcode_gtin = Some(gtin.into());
        self
    }
}
