//! Promotion Model
//!
//! Promotions either discount the price of a motor or attach a
//! price-neutral benefit (bonus). Rules scope a promotion to motors.
//! A promotion with no rules never applies.

use serde::{Deserialize, Serialize};

/// Promotion kind
///
/// Serialized inline on the promotion under the `kind` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromotionKind {
    Discount {
        /// Stackable discounts combine before the best exclusive one is chosen
        #[serde(default)]
        stackable: bool,
    },
    Bonus(BonusTerms),
}

/// Disclosure fields carried only by bonus promotions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BonusTerms {
    #[serde(default)]
    pub bonus_title: Option<String>,
    #[serde(default)]
    pub bonus_short_badge: Option<String>,
    #[serde(default)]
    pub bonus_description: Option<String>,
    #[serde(default)]
    pub warranty_extra_years: u32,
    #[serde(default)]
    pub terms_url: Option<String>,
}

/// Promotion entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub kind: PromotionKind,
    /// Percentage off (10 = 10%)
    #[serde(default)]
    pub discount_percentage: f64,
    /// Fixed amount off, applied before the percentage
    #[serde(default)]
    pub discount_fixed_amount: f64,
    pub is_active: bool,
    /// Valid from (Unix millis, inclusive)
    #[serde(default)]
    pub start_date: Option<i64>,
    /// Valid until (Unix millis, inclusive)
    #[serde(default)]
    pub end_date: Option<i64>,
    /// Higher = listed first among bonuses
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub highlight: bool,
}

impl Promotion {
    pub fn is_bonus(&self) -> bool {
        matches!(self.kind, PromotionKind::Bonus(_))
    }

    pub fn is_stackable(&self) -> bool {
        matches!(self.kind, PromotionKind::Discount { stackable: true })
    }

    /// Whether the promotion itself carries a non-zero discount
    pub fn has_discount_values(&self) -> bool {
        self.discount_percentage != 0.0 || self.discount_fixed_amount != 0.0
    }
}

/// Rule match payload, tagged by `rule_type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleMatch {
    All,
    /// Case-insensitive substring of the motor's model code
    Model { model: String },
    /// Case-insensitive equality with the motor type label
    MotorType { motor_type: String },
    /// Inclusive horsepower bounds; an unset bound is open
    HorsepowerRange {
        #[serde(default)]
        horsepower_min: Option<f64>,
        #[serde(default)]
        horsepower_max: Option<f64>,
    },
}

/// Promotion rule entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromotionRule {
    pub id: i64,
    pub promotion_id: i64,
    #[serde(flatten)]
    pub matcher: RuleMatch,
    /// Rule-level override (0 = fall back to the promotion)
    #[serde(default)]
    pub discount_percentage: f64,
    /// Rule-level override (0 = fall back to the promotion)
    #[serde(default)]
    pub discount_fixed_amount: f64,
}

impl PromotionRule {
    pub fn has_override(&self) -> bool {
        self.discount_percentage != 0.0 || self.discount_fixed_amount != 0.0
    }
}
