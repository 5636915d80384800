//! Pricing Result Model
//!
//! Derived output of promotion evaluation. Never stored on its own; a copy
//! travels with the selected motor in the wizard state.

use super::catalog::CatalogItem;
use serde::{Deserialize, Serialize};

/// Disclosure record for a bonus promotion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusOffer {
    pub id: i64,
    pub title: String,
    pub short_badge: String,
    pub description: Option<String>,
    pub warranty_extra_years: u32,
    pub terms_url: Option<String>,
    pub highlight: bool,
    /// Unix millis
    pub ends_at: Option<i64>,
    pub priority: i32,
}

/// Result of evaluating promotions against one catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingResult {
    /// Base price, or sale price when lower
    pub original_price: f64,
    /// Whole-number price after discounts (≥ 0)
    pub effective_price: f64,
    /// `original_price - effective_price`, never negative
    pub savings: f64,
    /// Discounts in application order, then bonuses
    pub applied_promotion_names: Vec<String>,
    pub bonus_offers: Vec<BonusOffer>,
    /// Earliest end date among contributing promotions (Unix millis)
    pub promo_ends_at: Option<i64>,
}

impl PricingResult {
    pub fn has_promotions(&self) -> bool {
        !self.applied_promotion_names.is_empty()
    }
}

/// Catalog item with its pricing attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub pricing: PricingResult,
}
