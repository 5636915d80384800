//! Promotion Evaluator
//!
//! Price a catalog item against the live promotion set:
//! - Stackable discounts apply one after another in input order
//! - The single best non-stackable discount applies on top
//! - Bonus promotions never touch the price, they are disclosed
//!
//! Uses rust_decimal for precision calculations.

use super::matcher::{
    DataIssue, is_promotion_active, matches_item, validate_promotion, validate_rule,
};
use rust_decimal::prelude::*;
use shared::models::{
    BonusOffer, CatalogItem, PricedItem, PricingResult, Promotion, PromotionKind, PromotionRule,
};
use std::collections::HashMap;
use tracing::debug;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

// ==================== Conversion Helpers ====================

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a price to a whole currency unit
#[inline]
fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ==================== Promotion Selection ====================

/// Promotion that applies to an item, with the rules that matched it
#[derive(Debug, Clone)]
pub struct ApplicablePromotion<'a> {
    pub promotion: &'a Promotion,
    pub rules: Vec<&'a PromotionRule>,
}

impl ApplicablePromotion<'_> {
    /// Defines a discount at promotion level or through a matched override
    fn defines_discount(&self) -> bool {
        self.promotion.has_discount_values() || self.rules.iter().any(|r| r.has_override())
    }
}

/// Promotion data checked and grouped once per pricing run
///
/// Malformed promotions and rules are dropped here; their issues are kept.
#[derive(Debug, Clone, Default)]
pub struct PromotionBook<'a> {
    promotions: Vec<&'a Promotion>,
    rules_by_promotion: HashMap<i64, Vec<&'a PromotionRule>>,
    issues: Vec<DataIssue>,
}

impl<'a> PromotionBook<'a> {
    pub fn new(promotions: &'a [Promotion], rules: &'a [PromotionRule]) -> Self {
        let mut issues = Vec::new();

        let promotions = promotions
            .iter()
            .filter(|promo| {
                let found = validate_promotion(promo);
                let valid = found.is_empty();
                issues.extend(found);
                valid
            })
            .collect();

        // Grouping preserves input order within each promotion
        let mut rules_by_promotion: HashMap<i64, Vec<&PromotionRule>> = HashMap::new();
        for rule in rules {
            let found = validate_rule(rule);
            if found.is_empty() {
                rules_by_promotion.entry(rule.promotion_id).or_default().push(rule);
            }
            issues.extend(found);
        }

        Self {
            promotions,
            rules_by_promotion,
            issues,
        }
    }

    /// Problems found while building the book
    pub fn issues(&self) -> &[DataIssue] {
        &self.issues
    }

    fn log_issues(&self) {
        for issue in &self.issues {
            tracing::warn!("Ignoring malformed promotion data: {issue}");
        }
    }
}

/// Select the promotions that are live at `now` and own a rule matching `item`
pub fn applicable_promotions<'a>(
    item: &CatalogItem,
    book: &PromotionBook<'a>,
    now: i64,
) -> Vec<ApplicablePromotion<'a>> {
    book.promotions
        .iter()
        .copied()
        .filter(|promo| is_promotion_active(promo, now))
        .filter_map(|promo| {
            let rules: Vec<&PromotionRule> = book
                .rules_by_promotion
                .get(&promo.id)
                .map(|rules| {
                    rules
                        .iter()
                        .filter(|rule| matches_item(rule, item))
                        .copied()
                        .collect()
                })
                .unwrap_or_default();

            if rules.is_empty() {
                None
            } else {
                Some(ApplicablePromotion {
                    promotion: promo,
                    rules,
                })
            }
        })
        .collect()
}

// ==================== Discount Calculation ====================

/// Price after one (fixed, percentage) pair: fixed first, floored at zero
fn apply_discount(start: Decimal, percentage: f64, fixed: f64) -> Decimal {
    let after_fixed = (start - to_decimal(fixed)).max(Decimal::ZERO);
    after_fixed * (Decimal::ONE - to_decimal(percentage) / Decimal::ONE_HUNDRED)
}

/// Best price a promotion reaches from `start`
///
/// Every matched rule is a candidate; a rule with an override uses its own
/// values, otherwise the promotion's. The lowest candidate wins, the first
/// one on ties.
pub fn best_price(applicable: &ApplicablePromotion<'_>, start: Decimal) -> Decimal {
    let promo = applicable.promotion;
    let mut best: Option<Decimal> = None;

    for rule in &applicable.rules {
        let candidate = if rule.has_override() {
            apply_discount(start, rule.discount_percentage, rule.discount_fixed_amount)
        } else {
            apply_discount(start, promo.discount_percentage, promo.discount_fixed_amount)
        };

        if best.is_none_or(|b| candidate < b) {
            best = Some(candidate);
        }
    }

    best.unwrap_or(start)
}

/// Keep the earlier of two optional end dates
fn earliest(current: Option<i64>, candidate: Option<i64>) -> Option<i64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

// ==================== Bonus Disclosure ====================

/// Build the disclosure record for a bonus promotion
pub fn bonus_offer(promo: &Promotion) -> Option<BonusOffer> {
    let PromotionKind::Bonus(terms) = &promo.kind else {
        return None;
    };

    let short_badge = match &terms.bonus_short_badge {
        Some(badge) => badge.clone(),
        None if terms.warranty_extra_years > 0 => {
            format!("+{}Y Warranty", terms.warranty_extra_years)
        }
        None => "Bonus Offer".to_string(),
    };

    Some(BonusOffer {
        id: promo.id,
        title: terms
            .bonus_title
            .clone()
            .unwrap_or_else(|| promo.name.clone()),
        short_badge,
        description: terms.bonus_description.clone(),
        warranty_extra_years: terms.warranty_extra_years,
        terms_url: terms.terms_url.clone(),
        highlight: promo.highlight,
        ends_at: promo.end_date,
        priority: promo.priority,
    })
}

// ==================== Evaluation ====================

/// Evaluate promotions for one item at `now` (Unix millis)
pub fn evaluate(
    item: &CatalogItem,
    promotions: &[Promotion],
    rules: &[PromotionRule],
    now: i64,
) -> PricingResult {
    let book = PromotionBook::new(promotions, rules);
    book.log_issues();
    evaluate_with_book(item, &book, now)
}

/// Evaluate against an already validated promotion book
pub fn evaluate_with_book(
    item: &CatalogItem,
    book: &PromotionBook<'_>,
    now: i64,
) -> PricingResult {
    let original = to_decimal(item.original_price());
    let applicable = applicable_promotions(item, book, now);

    let (bonuses, discounts): (Vec<_>, Vec<_>) = applicable
        .into_iter()
        .partition(|a| a.promotion.is_bonus());
    let (stackable, exclusive): (Vec<_>, Vec<_>) = discounts
        .into_iter()
        .filter(ApplicablePromotion::defines_discount)
        .partition(|a| a.promotion.is_stackable());

    let mut applied_names = Vec::new();
    let mut earliest_end = None;
    let mut running = original;

    // Step 1: stackable discounts, each from the running price
    for promo in &stackable {
        running = best_price(promo, running);
        applied_names.push(promo.promotion.name.clone());
        earliest_end = earliest(earliest_end, promo.promotion.end_date);
    }

    // Step 2: the single best non-stackable discount
    let mut winner: Option<(&ApplicablePromotion<'_>, Decimal)> = None;
    for promo in &exclusive {
        let price = best_price(promo, running);
        if winner.is_none_or(|(_, best)| price < best) {
            winner = Some((promo, price));
        }
    }
    if let Some((promo, price)) = winner {
        running = price;
        applied_names.push(promo.promotion.name.clone());
        earliest_end = earliest(earliest_end, promo.promotion.end_date);
    }

    let effective = round_whole(running.max(Decimal::ZERO));
    let savings = (original - effective).max(Decimal::ZERO);

    // Step 3: bonus disclosures, highlighted first then by priority
    let mut bonuses = bonuses;
    bonuses.sort_by(|a, b| {
        b.promotion
            .highlight
            .cmp(&a.promotion.highlight)
            .then(b.promotion.priority.cmp(&a.promotion.priority))
    });

    let mut bonus_offers = Vec::with_capacity(bonuses.len());
    for promo in &bonuses {
        if let Some(offer) = bonus_offer(promo.promotion) {
            bonus_offers.push(offer);
        }
        applied_names.push(promo.promotion.name.clone());
        earliest_end = earliest(earliest_end, promo.promotion.end_date);
    }

    debug!(
        item_id = item.id,
        model = %item.model,
        original = %original,
        effective = %effective,
        stackable_count = stackable.len(),
        exclusive_count = exclusive.len(),
        bonus_count = bonus_offers.len(),
        "Promotion evaluation result"
    );

    PricingResult {
        original_price: to_f64(original),
        effective_price: to_f64(effective),
        savings: to_f64(savings),
        applied_promotion_names: applied_names,
        bonus_offers,
        promo_ends_at: earliest_end,
    }
}

/// Attach pricing to every catalog item
pub fn price_catalog(
    items: &[CatalogItem],
    promotions: &[Promotion],
    rules: &[PromotionRule],
    now: i64,
) -> Vec<PricedItem> {
    let book = PromotionBook::new(promotions, rules);
    book.log_issues();
    items
        .iter()
        .map(|item| PricedItem {
            item: item.clone(),
            pricing: evaluate_with_book(item, &book, now),
        })
        .collect()
}
