//! Promotion Rule Matcher
//!
//! Logic for matching rules to motors and checking promotion validity
//! windows. Malformed payloads never match; they are reported as
//! [`DataIssue`]s and logged instead of failing the pricing run.

use shared::models::{CatalogItem, Promotion, PromotionRule, RuleMatch};
use thiserror::Error;

/// Data-shape problem found in a promotion or rule record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIssue {
    #[error("rule {rule_id}: horsepower range min {min} exceeds max {max}")]
    InvertedHorsepowerRange { rule_id: i64, min: f64, max: f64 },

    #[error("rule {rule_id}: horsepower bound is not a finite number")]
    InvalidHorsepowerBound { rule_id: i64 },

    #[error("rule {rule_id}: empty {field} payload")]
    EmptyPayload { rule_id: i64, field: &'static str },

    #[error("{owner} {id}: discount percentage {value} outside 0-100")]
    PercentageOutOfRange {
        owner: &'static str,
        id: i64,
        value: f64,
    },

    #[error("{owner} {id}: invalid fixed discount amount {value}")]
    InvalidFixedAmount {
        owner: &'static str,
        id: i64,
        value: f64,
    },
}

/// Check the discount pair shared by promotions and rule overrides
fn check_discount_values(
    owner: &'static str,
    id: i64,
    percentage: f64,
    fixed: f64,
    issues: &mut Vec<DataIssue>,
) {
    if !(0.0..=100.0).contains(&percentage) {
        issues.push(DataIssue::PercentageOutOfRange {
            owner,
            id,
            value: percentage,
        });
    }
    if !fixed.is_finite() || fixed < 0.0 {
        issues.push(DataIssue::InvalidFixedAmount {
            owner,
            id,
            value: fixed,
        });
    }
}

/// Validate a rule record
pub fn validate_rule(rule: &PromotionRule) -> Vec<DataIssue> {
    let mut issues = Vec::new();

    match &rule.matcher {
        RuleMatch::All => {}
        RuleMatch::Model { model } => {
            if model.trim().is_empty() {
                issues.push(DataIssue::EmptyPayload {
                    rule_id: rule.id,
                    field: "model",
                });
            }
        }
        RuleMatch::MotorType { motor_type } => {
            if motor_type.trim().is_empty() {
                issues.push(DataIssue::EmptyPayload {
                    rule_id: rule.id,
                    field: "motor_type",
                });
            }
        }
        RuleMatch::HorsepowerRange {
            horsepower_min,
            horsepower_max,
        } => {
            let bounds = [*horsepower_min, *horsepower_max];
            if bounds.iter().flatten().any(|b| !b.is_finite()) {
                issues.push(DataIssue::InvalidHorsepowerBound { rule_id: rule.id });
            } else if let (Some(min), Some(max)) = (horsepower_min, horsepower_max)
                && min > max
            {
                issues.push(DataIssue::InvertedHorsepowerRange {
                    rule_id: rule.id,
                    min: *min,
                    max: *max,
                });
            }
        }
    }

    check_discount_values(
        "rule",
        rule.id,
        rule.discount_percentage,
        rule.discount_fixed_amount,
        &mut issues,
    );

    issues
}

/// Validate the discount values of a promotion record
pub fn validate_promotion(promo: &Promotion) -> Vec<DataIssue> {
    let mut issues = Vec::new();
    check_discount_values(
        "promotion",
        promo.id,
        promo.discount_percentage,
        promo.discount_fixed_amount,
        &mut issues,
    );
    issues
}

/// Check if a rule's match payload selects the motor
///
/// Assumes the rule already passed [`validate_rule`]; the horsepower
/// comparison is still written so an inverted range matches nothing.
pub fn matches_item(rule: &PromotionRule, item: &CatalogItem) -> bool {
    match &rule.matcher {
        RuleMatch::All => true,
        RuleMatch::Model { model } => {
            let needle = fold_case(model);
            !needle.is_empty() && fold_case(&item.model).contains(&needle)
        }
        RuleMatch::MotorType { motor_type } => {
            let wanted = fold_case(motor_type);
            !wanted.is_empty() && fold_case(&item.motor_type) == wanted
        }
        RuleMatch::HorsepowerRange {
            horsepower_min,
            horsepower_max,
        } => {
            let min = horsepower_min.unwrap_or(f64::NEG_INFINITY);
            let max = horsepower_max.unwrap_or(f64::INFINITY);
            min <= item.horsepower && item.horsepower <= max
        }
    }
}

/// Trimmed, lowercased form used by the text matchers
fn fold_case(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Check if a promotion is live at `now` (Unix millis, bounds inclusive)
pub fn is_promotion_active(promo: &Promotion, now: i64) -> bool {
    if !promo.is_active {
        return false;
    }
    if let Some(start) = promo.start_date
        && start > now
    {
        return false;
    }
    if let Some(end) = promo.end_date
        && end < now
    {
        return false;
    }
    true
}
