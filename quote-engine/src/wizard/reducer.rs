//! Wizard State Reducer
//!
//! Every transition goes through [`reduce`], a pure function that returns
//! a new state. Invalid-looking transitions are not rejected here; the
//! step guard keeps blocking navigation until the data is complete.

use serde::{Deserialize, Serialize};
use shared::models::{
    BoatInfo, CatalogItem, Financing, FuelTankConfig, InstallConfig, PricingResult, PurchasePath,
    SelectedMotor, TradeInInfo, WizardState,
};
use tracing::debug;

use super::spec_sheet;

/// Wizard action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardAction {
    /// Select a motor together with its pricing snapshot
    SetMotor {
        item: CatalogItem,
        pricing: PricingResult,
    },
    SetPurchasePath(Option<PurchasePath>),
    SetBoatInfo(Option<BoatInfo>),
    SetTradeInInfo(Option<TradeInInfo>),
    SetFuelTankConfig(Option<FuelTankConfig>),
    SetInstallConfig(Option<InstallConfig>),
    SetFinancing(Financing),
    CompleteStep(u8),
    SetCurrentStep(u8),
    LoadFromStorage(Box<WizardState>),
    Reset,
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetMotor { .. } => "SET_MOTOR",
            Self::SetPurchasePath(_) => "SET_PURCHASE_PATH",
            Self::SetBoatInfo(_) => "SET_BOAT_INFO",
            Self::SetTradeInInfo(_) => "SET_TRADE_IN_INFO",
            Self::SetFuelTankConfig(_) => "SET_FUEL_TANK_CONFIG",
            Self::SetInstallConfig(_) => "SET_INSTALL_CONFIG",
            Self::SetFinancing(_) => "SET_FINANCING",
            Self::CompleteStep(_) => "COMPLETE_STEP",
            Self::SetCurrentStep(_) => "SET_CURRENT_STEP",
            Self::LoadFromStorage(_) => "LOAD_FROM_STORAGE",
            Self::Reset => "RESET",
        }
    }
}

/// Apply an action at time `at` (Unix millis), producing the next state
pub fn reduce(state: &WizardState, action: WizardAction, at: i64) -> WizardState {
    debug!(action = action.name(), at, "[Reducer] applying action");

    let mut next = match action {
        WizardAction::Reset => return WizardState::new(at),
        WizardAction::LoadFromStorage(loaded) => *loaded,
        WizardAction::SetMotor { item, pricing } => {
            // Spec sheet is derived in the same transition as the selection
            let specs = spec_sheet::lookup(&item);
            WizardState {
                motor: Some(SelectedMotor {
                    item,
                    pricing,
                    specs,
                }),
                ..state.clone()
            }
        }
        WizardAction::SetPurchasePath(purchase_path) => WizardState {
            purchase_path,
            ..state.clone()
        },
        WizardAction::SetBoatInfo(boat_info) => WizardState {
            boat_info,
            ..state.clone()
        },
        WizardAction::SetTradeInInfo(trade_in_info) => WizardState {
            trade_in_info,
            ..state.clone()
        },
        WizardAction::SetFuelTankConfig(fuel_tank_config) => WizardState {
            fuel_tank_config,
            ..state.clone()
        },
        WizardAction::SetInstallConfig(install_config) => WizardState {
            install_config,
            ..state.clone()
        },
        WizardAction::SetFinancing(financing) => WizardState {
            financing,
            ..state.clone()
        },
        WizardAction::CompleteStep(step) => {
            let mut next = state.clone();
            next.completed_steps.insert(step);
            next
        }
        WizardAction::SetCurrentStep(current_step) => WizardState {
            current_step,
            ..state.clone()
        },
    };

    next.last_activity = at;
    next
}
