//! Wizard Step Plans
//!
//! Step numbering depends on the purchase path and, for loose motors, on
//! whether the motor is a tiller and carries its own tank.

use serde::{Deserialize, Serialize};
use shared::models::{PurchasePath, WizardState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Motor,
    PurchasePath,
    BoatInfo,
    FuelTank,
    InstallConfig,
    TradeIn,
    QuoteSummary,
    Schedule,
}

pub const INSTALLED_PLAN: &[WizardStep] = &[
    WizardStep::Motor,
    WizardStep::PurchasePath,
    WizardStep::BoatInfo,
    WizardStep::InstallConfig,
    WizardStep::TradeIn,
    WizardStep::QuoteSummary,
    WizardStep::Schedule,
];

pub const LOOSE_REMOTE_PLAN: &[WizardStep] = &[
    WizardStep::Motor,
    WizardStep::PurchasePath,
    WizardStep::FuelTank,
    WizardStep::TradeIn,
    WizardStep::QuoteSummary,
    WizardStep::Schedule,
];

pub const LOOSE_TILLER_PLAN: &[WizardStep] = &[
    WizardStep::Motor,
    WizardStep::PurchasePath,
    WizardStep::FuelTank,
    WizardStep::TradeIn,
    WizardStep::QuoteSummary,
];

/// Portable tiller with integrated tank: no fuel setup, no pickup booking
pub const LOOSE_PORTABLE_PLAN: &[WizardStep] = &[
    WizardStep::Motor,
    WizardStep::PurchasePath,
    WizardStep::TradeIn,
    WizardStep::QuoteSummary,
];

/// Steps for the current selections; the installed plan until a path is set
pub fn plan(state: &WizardState) -> &'static [WizardStep] {
    match state.purchase_path {
        Some(PurchasePath::Loose) => match state.motor.as_ref().map(|m| &m.specs) {
            Some(specs) if specs.is_tiller() && specs.integrated_fuel_tank => LOOSE_PORTABLE_PLAN,
            Some(specs) if specs.is_tiller() => LOOSE_TILLER_PLAN,
            _ => LOOSE_REMOTE_PLAN,
        },
        Some(PurchasePath::Installed) | None => INSTALLED_PLAN,
    }
}

pub fn step_count(state: &WizardState) -> u8 {
    plan(state).len() as u8
}

/// Step at a 1-based position
pub fn step_at(state: &WizardState, position: u8) -> Option<WizardStep> {
    let index = usize::from(position).checked_sub(1)?;
    plan(state).get(index).copied()
}

/// 1-based position of a step in the current plan
pub fn position_of(state: &WizardState, step: WizardStep) -> Option<u8> {
    plan(state)
        .iter()
        .position(|s| *s == step)
        .map(|i| i as u8 + 1)
}
