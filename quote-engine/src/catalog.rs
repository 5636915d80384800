//! Catalog snapshot loading
//!
//! A snapshot file bundles everything the evaluator needs:
//!
//! ```json
//! { "items": [...], "promotions": [...], "rules": [...] }
//! ```

use serde::{Deserialize, Serialize};
use shared::models::{CatalogItem, PricedItem, Promotion, PromotionRule};
use std::path::Path;
use thiserror::Error;

use crate::pricing::{DataIssue, PromotionBook, price_catalog};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub rules: Vec<PromotionRule>,
}

impl CatalogSnapshot {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Malformed promotion and rule records; pricing skips them
    pub fn issues(&self) -> Vec<DataIssue> {
        PromotionBook::new(&self.promotions, &self.rules)
            .issues()
            .to_vec()
    }

    /// Price every item at `now` (Unix millis), logging each issue once
    pub fn priced(&self, now: i64) -> Vec<PricedItem> {
        price_catalog(&self.items, &self.promotions, &self.rules, now)
    }
}
