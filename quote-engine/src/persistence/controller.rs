//! Wizard Persistence Controller
//!
//! Sole reader and writer of the persisted wizard record.
//!
//! # Write policy
//!
//! | Change | Write |
//! |--------|-------|
//! | `trade_in_info` differs from the last seen value | immediately |
//! | anything else | after `debounce_ms` of quiet, last write wins |
//!
//! # Expiry
//!
//! A stored record is discarded on load when older than `max_age_ms` or
//! idle longer than `inactivity_ms`. Independently, the inactivity timer
//! removes the record after `inactivity_ms` without activity.
//!
//! Storage failures are logged and treated as "nothing persisted"; the
//! wizard keeps working in memory.

use serde::{Deserialize, Serialize};
use shared::models::{TradeInInfo, WizardState};
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::scheduler::Deferred;
use super::store::{KvStore, StoreResult};

pub const DEFAULT_STORAGE_KEY: &str = "quote_wizard_state";
pub const DEFAULT_DEBOUNCE_MS: i64 = 1_000;
pub const DEFAULT_MAX_AGE_MS: i64 = 24 * 60 * 60 * 1_000;
pub const DEFAULT_INACTIVITY_MS: i64 = 30 * 60 * 1_000;

/// Controller timing and key options
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceOptions {
    pub storage_key: String,
    pub debounce_ms: i64,
    pub max_age_ms: i64,
    pub inactivity_ms: i64,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_age_ms: DEFAULT_MAX_AGE_MS,
            inactivity_ms: DEFAULT_INACTIVITY_MS,
        }
    }
}

/// Stored record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedRecord {
    pub state: WizardState,
    /// Write time (Unix millis)
    pub timestamp: i64,
    /// Last user activity (Unix millis)
    pub last_activity: i64,
}

impl PersistedRecord {
    /// Shape check beyond what deserialization enforces
    pub fn is_well_formed(&self) -> bool {
        self.timestamp > 0
            && self.last_activity > 0
            && self.state.current_step >= 1
            && self.state.completed_steps.iter().all(|step| *step >= 1)
    }
}

/// How a scheduled state will reach the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Immediate,
    Debounced,
}

/// Result of firing due timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Idle,
    Written,
    /// Inactivity bound reached; the record was removed and the caller's
    /// in-memory state is stale
    Expired,
}

/// Why a stored record was not restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    Corrupt,
    Malformed,
    Expired,
    Inactive,
}

pub struct PersistenceController<S, C> {
    store: S,
    clock: C,
    options: PersistenceOptions,
    pending_write: Deferred<WizardState>,
    inactivity: Deferred<()>,
    /// Trade-in value at the last scheduled or restored state
    last_trade_in: Option<TradeInInfo>,
}

impl<S, C> std::fmt::Debug for PersistenceController<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceController")
            .field("options", &self.options)
            .field("pending_write", &self.pending_write.deadline())
            .field("inactivity", &self.inactivity.deadline())
            .finish()
    }
}

impl<S: KvStore, C: Clock> PersistenceController<S, C> {
    pub fn new(store: S, clock: C, options: PersistenceOptions) -> Self {
        Self {
            store,
            clock,
            options,
            pending_write: Deferred::new(),
            inactivity: Deferred::new(),
            last_trade_in: None,
        }
    }

    pub fn options(&self) -> &PersistenceOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn has_pending_write(&self) -> bool {
        self.pending_write.is_pending()
    }

    /// Earliest timer deadline, if any timer is armed
    pub fn next_deadline(&self) -> Option<i64> {
        match (self.pending_write.deadline(), self.inactivity.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Restore the persisted state, discarding stale or invalid records
    pub fn load_on_init(&mut self) -> Option<WizardState> {
        let raw = match self.store.get(&self.options.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read persisted wizard state: {e}");
                return None;
            }
        };

        let record: PersistedRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("Persisted wizard state is corrupt: {e}");
                self.discard(DiscardReason::Corrupt);
                return None;
            }
        };

        if !record.is_well_formed() {
            self.discard(DiscardReason::Malformed);
            return None;
        }

        let now = self.now();
        if now - record.timestamp > self.options.max_age_ms {
            self.discard(DiscardReason::Expired);
            return None;
        }
        if now - record.last_activity > self.options.inactivity_ms {
            self.discard(DiscardReason::Inactive);
            return None;
        }

        self.touch();
        self.last_trade_in = record.state.trade_in_info.clone();

        info!(
            current_step = record.state.current_step,
            age_ms = now - record.timestamp,
            "Restored persisted wizard state"
        );
        Some(record.state)
    }

    /// Persist after a reducer transition
    pub fn schedule(&mut self, state: &WizardState) -> WriteMode {
        self.touch();

        if state.trade_in_info != self.last_trade_in {
            self.last_trade_in = state.trade_in_info.clone();
            // The immediate write supersedes any older pending snapshot
            self.pending_write.cancel();
            self.write(state);
            return WriteMode::Immediate;
        }

        let due_at = self.now() + self.options.debounce_ms;
        let replaced = self.pending_write.schedule(due_at, state.clone());
        debug!(due_at, replaced, "Debounced wizard state write");
        WriteMode::Debounced
    }

    /// Record user activity without a state change
    pub fn touch(&mut self) {
        let due_at = self.now() + self.options.inactivity_ms;
        self.inactivity.schedule(due_at, ());
    }

    /// Fire due timers
    pub fn poll(&mut self) -> PollOutcome {
        let now = self.now();
        let mut outcome = PollOutcome::Idle;

        if let Some(state) = self.pending_write.take_due(now) {
            self.write(&state);
            outcome = PollOutcome::Written;
        }

        if self.inactivity.take_due(now).is_some() {
            info!("Wizard inactive, clearing persisted state");
            self.pending_write.cancel();
            self.last_trade_in = None;
            self.remove();
            outcome = PollOutcome::Expired;
        }

        outcome
    }

    /// Write the pending snapshot now (teardown)
    pub fn flush(&mut self) {
        if let Some(state) = self.pending_write.cancel() {
            self.write(&state);
        }
    }

    /// Cancel pending work and remove the stored record (start over)
    pub fn clear(&mut self) {
        self.pending_write.cancel();
        self.inactivity.cancel();
        self.last_trade_in = None;
        self.remove();
    }

    fn discard(&mut self, reason: DiscardReason) {
        info!(?reason, "Discarding persisted wizard state");
        self.remove();
    }

    fn write(&self, state: &WizardState) {
        if let Err(e) = self.try_write(state) {
            warn!("Failed to persist wizard state: {e}");
        }
    }

    fn try_write(&self, state: &WizardState) -> StoreResult<()> {
        let now = self.now();
        let record = PersistedRecord {
            state: state.clone(),
            timestamp: now,
            last_activity: now,
        };
        let value = serde_json::to_string(&record)?;
        self.store.set(&self.options.storage_key, &value)?;
        debug!(current_step = state.current_step, "Persisted wizard state");
        Ok(())
    }

    fn remove(&self) {
        if let Err(e) = self.store.remove(&self.options.storage_key) {
            warn!("Failed to remove persisted wizard state: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::clock::ManualClock;
    use crate::persistence::store::{MemoryStore, StoreError};
    use shared::models::PurchasePath;
    use std::sync::Arc;

    const START: i64 = 1_760_000_000_000;

    /// Store whose every call fails
    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn setup() -> (
        PersistenceController<Arc<MemoryStore>, ManualClock>,
        Arc<MemoryStore>,
        ManualClock,
    ) {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(START);
        let controller = PersistenceController::new(
            Arc::clone(&store),
            clock.clone(),
            PersistenceOptions::default(),
        );
        (controller, store, clock)
    }

    fn stored(store: &MemoryStore) -> Option<PersistedRecord> {
        store
            .get(DEFAULT_STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    fn trade_in(value: Option<f64>) -> TradeInInfo {
        TradeInInfo {
            has_trade_in: true,
            brand: Some("Evinrude".to_string()),
            year: Some(2008),
            horsepower: Some(60.0),
            condition: None,
            estimated_value: value,
        }
    }

    #[test]
    fn test_debounce_last_write_wins() {
        let (mut controller, store, clock) = setup();
        let mut state = WizardState::new(START);

        state.current_step = 2;
        assert_eq!(controller.schedule(&state), WriteMode::Debounced);
        clock.advance(600);
        state.current_step = 3;
        controller.schedule(&state);

        // First deadline passed, but it was rescheduled
        clock.advance(600);
        controller.poll();
        assert!(stored(&store).is_none());

        clock.advance(400);
        controller.poll();
        let record = stored(&store).unwrap();
        assert_eq!(record.state.current_step, 3);
        assert_eq!(record.timestamp, START + 1_600);
        assert_eq!(record.last_activity, START + 1_600);
        assert!(!controller.has_pending_write());
    }

    #[test]
    fn test_trade_in_change_writes_immediately() {
        let (mut controller, store, _clock) = setup();
        let mut state = WizardState::new(START);
        state.current_step = 2;
        controller.schedule(&state);

        state.trade_in_info = Some(trade_in(None));
        assert_eq!(controller.schedule(&state), WriteMode::Immediate);
        assert!(stored(&store).unwrap().state.trade_in_info.is_some());
        assert!(!controller.has_pending_write());

        // Same trade-in again is not a change
        state.current_step = 3;
        assert_eq!(controller.schedule(&state), WriteMode::Debounced);

        state.trade_in_info = Some(trade_in(Some(2000.0)));
        assert_eq!(controller.schedule(&state), WriteMode::Immediate);
    }

    #[test]
    fn test_load_returns_fresh_record() {
        let (mut controller, _store, clock) = setup();
        let mut state = WizardState::new(START);
        state.purchase_path = Some(PurchasePath::Loose);
        controller.schedule(&state);
        controller.flush();

        clock.advance(10 * 60 * 1_000);
        let mut fresh = PersistenceController::new(
            Arc::clone(controller.store()),
            clock.clone(),
            PersistenceOptions::default(),
        );
        let loaded = fresh.load_on_init().unwrap();
        assert_eq!(loaded.purchase_path, Some(PurchasePath::Loose));
        assert_eq!(
            fresh.next_deadline(),
            Some(clock.now_millis() + DEFAULT_INACTIVITY_MS)
        );
    }

    #[test]
    fn test_load_missing_record() {
        let (mut controller, ..) = setup();
        assert!(controller.load_on_init().is_none());
    }

    #[test]
    fn test_load_discards_old_record() {
        let (mut controller, store, clock) = setup();
        let record = PersistedRecord {
            state: WizardState::new(START),
            timestamp: START - 25 * 60 * 60 * 1_000,
            last_activity: START - 60_000,
        };
        store
            .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        assert!(controller.load_on_init().is_none());
        assert!(store.is_empty());
        assert_eq!(clock.now_millis(), START);
    }

    #[test]
    fn test_load_discards_inactive_record() {
        let (mut controller, store, _clock) = setup();
        let record = PersistedRecord {
            state: WizardState::new(START),
            timestamp: START - 60_000,
            last_activity: START - 31 * 60 * 1_000,
        };
        store
            .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        assert!(controller.load_on_init().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_discards_corrupt_and_malformed() {
        let (mut controller, store, _clock) = setup();
        store.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        assert!(controller.load_on_init().is_none());
        assert!(store.is_empty());

        store
            .set(DEFAULT_STORAGE_KEY, r#"{"state":{"motor":null},"timestamp":1}"#)
            .unwrap();
        assert!(controller.load_on_init().is_none());
        assert!(store.is_empty());

        let mut state = WizardState::new(START);
        state.current_step = 0;
        let record = PersistedRecord {
            state,
            timestamp: START,
            last_activity: START,
        };
        store
            .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();
        assert!(controller.load_on_init().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_inactivity_timer_clears_record() {
        let (mut controller, store, clock) = setup();
        let state = WizardState::new(START);
        controller.schedule(&state);
        clock.advance(DEFAULT_DEBOUNCE_MS);
        assert_eq!(controller.poll(), PollOutcome::Written);
        assert!(stored(&store).is_some());

        clock.advance(DEFAULT_INACTIVITY_MS - DEFAULT_DEBOUNCE_MS - 1);
        assert_eq!(controller.poll(), PollOutcome::Idle);
        assert!(stored(&store).is_some());

        clock.advance(1);
        assert_eq!(controller.poll(), PollOutcome::Expired);
        assert!(stored(&store).is_none());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_activity_pushes_inactivity_deadline() {
        let (mut controller, _store, clock) = setup();
        controller.schedule(&WizardState::new(START));
        clock.advance(20 * 60 * 1_000);
        controller.touch();
        clock.advance(20 * 60 * 1_000);
        controller.poll();
        assert_eq!(
            controller.next_deadline(),
            Some(START + 20 * 60 * 1_000 + DEFAULT_INACTIVITY_MS)
        );
    }

    #[test]
    fn test_clear_cancels_pending_write() {
        let (mut controller, store, clock) = setup();
        let mut state = WizardState::new(START);
        state.trade_in_info = Some(trade_in(Some(900.0)));
        controller.schedule(&state);
        state.current_step = 4;
        controller.schedule(&state);
        assert!(controller.has_pending_write());

        controller.clear();
        clock.advance(DEFAULT_DEBOUNCE_MS * 5);
        controller.poll();
        assert!(store.is_empty());
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_broken_store_degrades() {
        let clock = ManualClock::new(START);
        let mut controller =
            PersistenceController::new(BrokenStore, clock.clone(), PersistenceOptions::default());

        assert!(controller.load_on_init().is_none());
        let mut state = WizardState::new(START);
        state.trade_in_info = Some(trade_in(None));
        assert_eq!(controller.schedule(&state), WriteMode::Immediate);
        clock.advance(DEFAULT_INACTIVITY_MS);
        controller.poll();
        controller.clear();
    }
}
