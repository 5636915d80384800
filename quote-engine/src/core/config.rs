use crate::persistence::PersistenceOptions;
use crate::persistence::controller::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_INACTIVITY_MS, DEFAULT_MAX_AGE_MS, DEFAULT_STORAGE_KEY,
};
use std::path::PathBuf;

/// Quote engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | redb file and logs |
/// | LOG_LEVEL | info | tracing max level |
/// | CATALOG_PATH | (none) | catalog snapshot for the CLI |
/// | QUOTE_STORAGE_KEY | quote_wizard_state | persisted record key |
/// | QUOTE_DEBOUNCE_MS | 1000 | debounce quiet period |
/// | QUOTE_MAX_AGE_MS | 86400000 | max record age |
/// | QUOTE_INACTIVITY_MS | 1800000 | inactivity bound |
///
/// # Example
///
/// ```ignore
/// QUOTE_DEBOUNCE_MS=250 CATALOG_PATH=catalog.json cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub log_level: String,
    pub catalog_path: Option<String>,
    pub storage_key: String,
    pub debounce_ms: i64,
    pub max_age_ms: i64,
    pub inactivity_ms: i64,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            catalog_path: std::env::var("CATALOG_PATH").ok(),
            storage_key: std::env::var("QUOTE_STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_STORAGE_KEY.into()),
            debounce_ms: std::env::var("QUOTE_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
            max_age_ms: std::env::var("QUOTE_MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_AGE_MS),
            inactivity_ms: std::env::var("QUOTE_INACTIVITY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_INACTIVITY_MS),
        }
    }

    pub fn persistence_options(&self) -> PersistenceOptions {
        PersistenceOptions {
            storage_key: self.storage_key.clone(),
            debounce_ms: self.debounce_ms,
            max_age_ms: self.max_age_ms,
            inactivity_ms: self.inactivity_ms,
        }
    }

    /// redb database file for persisted wizard state
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("wizard.redb")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}
