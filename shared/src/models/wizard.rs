//! Quote Wizard Model
//!
//! Accumulated selections of one customer walking the quote wizard.
//! Mutated only through the reducer; persisted as JSON.

use super::catalog::CatalogItem;
use super::pricing::PricingResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the motor leaves the shop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePath {
    /// Boxed motor, customer rigs it
    Loose,
    /// Dealer installs on the customer's boat
    Installed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartingType {
    Manual,
    Electric,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    Tiller,
    Remote,
}

/// Spec sheet derived from the model code at selection time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotorSpecs {
    pub starting: StartingType,
    pub control: ControlType,
    /// Shaft length in inches (15/20/25/30)
    pub shaft_inches: u8,
    pub power_trim: bool,
    pub command_thrust: bool,
    /// Small tillers carry their own tank and skip fuel setup
    pub integrated_fuel_tank: bool,
}

impl MotorSpecs {
    pub fn is_tiller(&self) -> bool {
        self.control == ControlType::Tiller
    }
}

/// Selected motor with its pricing and spec sheet snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedMotor {
    pub item: CatalogItem,
    pub pricing: PricingResult,
    pub specs: MotorSpecs,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoatInfo {
    pub boat_type: String,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub length_feet: f64,
    /// Transom height in inches, used to confirm shaft length
    #[serde(default)]
    pub transom_inches: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TradeInCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Trade-in details; `estimated_value` comes from the external estimator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeInInfo {
    pub has_trade_in: bool,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub horsepower: Option<f64>,
    #[serde(default)]
    pub condition: Option<TradeInCondition>,
    #[serde(default)]
    pub estimated_value: Option<f64>,
}

impl TradeInInfo {
    pub fn none() -> Self {
        Self {
            has_trade_in: false,
            brand: None,
            year: None,
            horsepower: None,
            condition: None,
            estimated_value: None,
        }
    }

    /// A declared trade-in must carry its estimated value
    pub fn is_resolved(&self) -> bool {
        !self.has_trade_in || self.estimated_value.is_some()
    }

    /// Credit applied to the quote
    pub fn credit(&self) -> f64 {
        if self.has_trade_in {
            self.estimated_value.unwrap_or(0.0).max(0.0)
        } else {
            0.0
        }
    }
}

/// Fuel setup for loose motors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelTankConfig {
    /// 0 = customer supplies their own tank
    pub tank_gallons: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ControlsOption {
    /// Reuse the boat's existing controls
    Reuse,
    New,
}

/// Rigging choices for installed motors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallConfig {
    pub controls: ControlsOption,
    #[serde(default)]
    pub include_propeller: bool,
    #[serde(default)]
    pub remove_old_motor: bool,
    /// Labour and parts total
    pub installation_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Financing {
    pub down_payment: f64,
    pub term_months: u32,
    pub apr_percent: f64,
}

impl Default for Financing {
    fn default() -> Self {
        Self {
            down_payment: 0.0,
            term_months: 60,
            apr_percent: 7.99,
        }
    }
}

/// Wizard state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WizardState {
    pub motor: Option<SelectedMotor>,
    pub purchase_path: Option<PurchasePath>,
    pub boat_info: Option<BoatInfo>,
    pub trade_in_info: Option<TradeInInfo>,
    pub fuel_tank_config: Option<FuelTankConfig>,
    pub install_config: Option<InstallConfig>,
    pub financing: Financing,
    pub completed_steps: BTreeSet<u8>,
    pub current_step: u8,
    /// Unix millis
    pub last_activity: i64,
    /// Unix millis
    pub created_at: i64,
}

impl WizardState {
    /// Empty wizard positioned on the first step
    pub fn new(now: i64) -> Self {
        Self {
            motor: None,
            purchase_path: None,
            boat_info: None,
            trade_in_info: None,
            fuel_tank_config: None,
            install_config: None,
            financing: Financing::default(),
            completed_steps: BTreeSet::new(),
            current_step: 1,
            last_activity: now,
            created_at: now,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.purchase_path == Some(PurchasePath::Installed)
    }

    /// No trade-in declared, or the declared one has its value
    pub fn trade_in_resolved(&self) -> bool {
        self.trade_in_info
            .as_ref()
            .is_none_or(TradeInInfo::is_resolved)
    }
}
