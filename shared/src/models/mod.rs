//! Data models
//!
//! Shared between the quote engine and its callers (catalog source,
//! presentation layer). All IDs are `i64`, all timestamps Unix millis.

pub mod catalog;
pub mod pricing;
pub mod promotion;
pub mod wizard;

// Re-exports
pub use catalog::*;
pub use pricing::*;
pub use promotion::*;
pub use wizard::*;
