//! Quote Calculator
//!
//! Turn a wizard state into customer-facing totals: motor price from the
//! pricing snapshot, path-specific add-ons, trade-in credit and an
//! amortized monthly payment.

use super::evaluator::{to_decimal, to_f64};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::models::{BonusOffer, Financing, PurchasePath, WizardState};

/// Quote totals for the summary step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteSummary {
    pub motor_id: i64,
    pub motor_model: String,
    pub motor_price: f64,
    pub promotion_savings: f64,
    pub fuel_tank_price: f64,
    pub installation_price: f64,
    pub trade_in_credit: f64,
    /// Motor + add-ons - trade-in, never negative
    pub subtotal: f64,
    pub down_payment: f64,
    pub amount_financed: f64,
    pub term_months: u32,
    pub apr_percent: f64,
    pub monthly_payment: f64,
    pub total_of_payments: f64,
    pub bonus_offers: Vec<BonusOffer>,
    pub promo_ends_at: Option<i64>,
}

/// Standard amortized payment: P·r / (1 - (1 + r)^-n), r = APR / 1200
///
/// 0% APR divides evenly; a zero term yields no payment.
pub fn monthly_payment(principal: f64, term_months: u32, apr_percent: f64) -> f64 {
    if term_months == 0 || principal <= 0.0 {
        return 0.0;
    }
    let n = term_months as f64;
    let rate = apr_percent / 1200.0;
    let payment = if rate <= 0.0 {
        principal / n
    } else {
        principal * rate / (1.0 - (1.0 + rate).powf(-n))
    };
    to_f64(to_decimal(payment))
}

/// Build the quote for a wizard state; `None` until a motor is chosen
pub fn build_quote(state: &WizardState) -> Option<QuoteSummary> {
    let motor = state.motor.as_ref()?;
    let pricing = &motor.pricing;

    let fuel_tank = match (state.purchase_path, &state.fuel_tank_config) {
        (Some(PurchasePath::Loose), Some(config)) => to_decimal(config.price.max(0.0)),
        _ => Decimal::ZERO,
    };
    let installation = match (state.purchase_path, &state.install_config) {
        (Some(PurchasePath::Installed), Some(config)) => {
            to_decimal(config.installation_cost.max(0.0))
        }
        _ => Decimal::ZERO,
    };
    let trade_in = state
        .trade_in_info
        .as_ref()
        .map(|t| to_decimal(t.credit()))
        .unwrap_or(Decimal::ZERO);

    let motor_price = to_decimal(pricing.effective_price);
    let subtotal = (motor_price + fuel_tank + installation - trade_in).max(Decimal::ZERO);

    let Financing {
        down_payment,
        term_months,
        apr_percent,
    } = state.financing.clone();
    let down = to_decimal(down_payment.max(0.0)).min(subtotal);
    let financed = subtotal - down;

    let monthly = monthly_payment(to_f64(financed), term_months, apr_percent);
    let total_of_payments = to_decimal(monthly) * Decimal::from(term_months);

    Some(QuoteSummary {
        motor_id: motor.item.id,
        motor_model: motor.item.model.clone(),
        motor_price: to_f64(motor_price),
        promotion_savings: pricing.savings,
        fuel_tank_price: to_f64(fuel_tank),
        installation_price: to_f64(installation),
        trade_in_credit: to_f64(trade_in),
        subtotal: to_f64(subtotal),
        down_payment: to_f64(down),
        amount_financed: to_f64(financed),
        term_months,
        apr_percent,
        monthly_payment: monthly,
        total_of_payments: to_f64(total_of_payments),
        bonus_offers: pricing.bonus_offers.clone(),
        promo_ends_at: pricing.promo_ends_at,
    })
}
