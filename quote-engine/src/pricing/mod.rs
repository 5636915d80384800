//! Promotion Pricing Module
//!
//! Pure, synchronous pricing of catalog items against promotions, plus
//! quote totals for the wizard summary.

pub mod evaluator;
pub mod matcher;
pub mod quote;

pub use evaluator::*;
pub use matcher::*;
pub use quote::*;
