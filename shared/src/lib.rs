//! Shared types for the quote engine
//!
//! Catalog, promotion, pricing and wizard state models plus small
//! time utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
