//! Wizard Persistence Module
//!
//! Durable storage of the wizard state behind a key/value port, with
//! debounced writes and staleness expiry driven by an injected clock.

pub mod clock;
pub mod controller;
pub mod scheduler;
pub mod store;
pub mod worker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{
    DiscardReason, PersistedRecord, PersistenceController, PersistenceOptions, PollOutcome,
    WriteMode,
};
pub use scheduler::Deferred;
pub use store::{KvStore, MemoryStore, RedbStore, StoreError, StoreResult};
pub use worker::{PersistenceCommand, PersistenceHandle, PersistenceWorker};
