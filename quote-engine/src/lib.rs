//! Quote Engine - outboard motor sales configurator core
//!
//! # Overview
//!
//! - **Pricing** (`pricing`): promotion matching, stacking and bonus
//!   disclosure; quote totals and financing
//! - **Wizard** (`wizard`): reducer, step plans, accessibility guard
//! - **Persistence** (`persistence`): debounced, expiring storage of the
//!   wizard state behind a key/value port
//!
//! # Module layout
//!
//! ```text
//! quote-engine/src/
//! ├── core/          # configuration
//! ├── pricing/       # matcher, evaluator, quote
//! ├── wizard/        # reducer, guard, steps, session
//! ├── persistence/   # store, clock, controller, worker
//! ├── utils/         # logging
//! └── catalog.rs     # catalog snapshot loading
//! ```

pub mod catalog;
pub mod core;
pub mod persistence;
pub mod pricing;
pub mod utils;
pub mod wizard;

// Re-export public types
pub use catalog::{CatalogError, CatalogSnapshot};
pub use core::Config;
pub use persistence::{
    KvStore, MemoryStore, PersistenceController, PersistenceOptions, RedbStore, StoreResult,
    SystemClock,
};
pub use pricing::{QuoteSummary, build_quote, evaluate, price_catalog};
pub use wizard::{WizardAction, WizardSession, is_accessible, reduce};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Create the log directory and install the logger
pub fn setup_environment(config: &Config) -> std::io::Result<()> {
    std::fs::create_dir_all(config.log_dir())?;
    init_logger_with_file(Some(&config.log_level), Some(&config.log_dir()));
    Ok(())
}

/// Open the redb store under `WORK_DIR` and restore the wizard from it
pub fn open_session(config: &Config) -> StoreResult<WizardSession<RedbStore, SystemClock>> {
    std::fs::create_dir_all(&config.work_dir)?;
    let store = RedbStore::open(config.database_path())?;
    let controller = PersistenceController::new(store, SystemClock, config.persistence_options());
    Ok(WizardSession::restore(controller))
}
