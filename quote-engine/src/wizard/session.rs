//! Wizard Session
//!
//! Owns the live wizard state and its persistence controller. All
//! mutations go through [`WizardSession::dispatch`]: reduce, then schedule
//! persistence. Reset cancels the pending write before clearing state;
//! inactivity expiry detected by [`WizardSession::poll`] resets the same way.

use shared::models::WizardState;
use tracing::debug;

use super::guard;
use super::reducer::{WizardAction, reduce};
use crate::persistence::{Clock, KvStore, PersistenceController, PollOutcome};
use crate::pricing::{QuoteSummary, build_quote};

pub struct WizardSession<S, C> {
    state: WizardState,
    persistence: PersistenceController<S, C>,
}

impl<S: KvStore, C: Clock> WizardSession<S, C> {
    /// Start with an empty wizard
    pub fn new(persistence: PersistenceController<S, C>) -> Self {
        let state = WizardState::new(persistence.now());
        Self { state, persistence }
    }

    /// Start from the persisted state when a fresh one exists
    pub fn restore(persistence: PersistenceController<S, C>) -> Self {
        let mut session = Self::new(persistence);
        if let Some(stored) = session.persistence.load_on_init() {
            let now = session.persistence.now();
            session.state = reduce(
                &session.state,
                WizardAction::LoadFromStorage(Box::new(stored)),
                now,
            );
        }
        session
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn persistence(&self) -> &PersistenceController<S, C> {
        &self.persistence
    }

    /// Apply an action and schedule persistence of the result
    pub fn dispatch(&mut self, action: WizardAction) -> &WizardState {
        let now = self.persistence.now();

        if matches!(action, WizardAction::Reset) {
            // No stale write may land after the reset
            self.persistence.clear();
            self.state = reduce(&self.state, action, now);
            debug!("Wizard reset");
            return &self.state;
        }

        self.state = reduce(&self.state, action, now);
        self.persistence.schedule(&self.state);
        &self.state
    }

    pub fn is_accessible(&self, step: u8) -> bool {
        guard::is_accessible(&self.state, step)
    }

    /// Move to `step` if the guard allows it
    pub fn navigate(&mut self, step: u8) -> bool {
        if !self.is_accessible(step) {
            debug!(step, "Navigation blocked by step guard");
            return false;
        }
        self.dispatch(WizardAction::SetCurrentStep(step));
        true
    }

    /// Complete the current step and move to the next one when reachable
    pub fn advance(&mut self) -> bool {
        let current = self.state.current_step;
        self.dispatch(WizardAction::CompleteStep(current));
        self.navigate(current.saturating_add(1))
    }

    pub fn quote(&self) -> Option<QuoteSummary> {
        build_quote(&self.state)
    }

    /// Fire due persistence timers; a stale session starts over
    pub fn poll(&mut self) -> PollOutcome {
        let outcome = self.persistence.poll();
        if outcome == PollOutcome::Expired {
            self.dispatch(WizardAction::Reset);
        }
        outcome
    }

    /// Flush any pending write (navigation away / teardown)
    pub fn close(mut self) -> PersistenceController<S, C> {
        self.persistence.flush();
        self.persistence
    }
}
