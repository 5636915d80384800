//! Step Accessibility Guard
//!
//! Pure predicates deciding whether a wizard step may be entered. Re-run
//! after every transition; nothing here is cached or mutated.

use shared::models::WizardState;

use super::steps::{WizardStep, step_at, step_count};

/// Check whether step `step` (1-based) may be entered
///
/// - 1: always
/// - 2: motor chosen
/// - 3: motor and purchase path
/// - 4+: installed motors also need boat info
/// - between 4 and the last step: the previous step must be completed
/// - quote summary and scheduling: a declared trade-in must carry its
///   estimated value
pub fn is_accessible(state: &WizardState, step: u8) -> bool {
    let last = step_count(state);
    if step == 0 || step > last {
        return false;
    }

    let has_motor = state.motor.is_some();
    let has_path = state.purchase_path.is_some();

    match step {
        1 => true,
        2 => has_motor,
        3 => has_motor && has_path,
        _ => {
            if !(has_motor && has_path) {
                return false;
            }
            if state.is_installed() && state.boat_info.is_none() {
                return false;
            }
            let needs_trade_in_value = matches!(
                step_at(state, step),
                Some(WizardStep::QuoteSummary | WizardStep::Schedule)
            );
            if needs_trade_in_value && !state.trade_in_resolved() {
                return false;
            }
            step == 4 || step == last || state.completed_steps.contains(&(step - 1))
        }
    }
}

/// All currently enterable steps, in order
pub fn accessible_steps(state: &WizardState) -> Vec<u8> {
    (1..=step_count(state))
        .filter(|step| is_accessible(state, *step))
        .collect()
}

/// Furthest step reachable by walking forward without gaps
pub fn furthest_reachable_step(state: &WizardState) -> u8 {
    (1..=step_count(state))
        .take_while(|step| is_accessible(state, *step))
        .last()
        .unwrap_or(1)
}
