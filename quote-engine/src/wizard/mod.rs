//! Quote Wizard Module
//!
//! State machine for the quote wizard: reducer, step plans, accessibility
//! guard and the session that ties them to persistence.

pub mod guard;
pub mod reducer;
pub mod session;
pub mod spec_sheet;
pub mod steps;

pub use guard::{accessible_steps, furthest_reachable_step, is_accessible};
pub use reducer::{WizardAction, reduce};
pub use session::WizardSession;
pub use steps::{WizardStep, plan, position_of, step_at, step_count};
