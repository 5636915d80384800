//! Catalog Model
//!
//! Motors as supplied by the inventory source. A catalog item is an
//! immutable snapshot for the duration of one pricing run.

use serde::{Deserialize, Serialize};

/// Catalog item (one outboard motor in inventory)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    /// Model code as printed on the spec sheet, e.g. "115 ELPT CT"
    pub model: String,
    /// List price (≥ 0)
    pub base_price: f64,
    /// Sale price; only meaningful when lower than `base_price`
    #[serde(default)]
    pub sale_price: Option<f64>,
    pub category: String,
    pub horsepower: f64,
    /// Motor type / variant label, e.g. "FourStroke", "Pro XS"
    pub motor_type: String,
    #[serde(default)]
    pub in_stock: bool,
}

impl CatalogItem {
    /// Starting price for promotions: the sale price when it undercuts
    /// the base price, otherwise the base price.
    pub fn original_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale < self.base_price => sale,
            _ => self.base_price,
        }
    }
}
