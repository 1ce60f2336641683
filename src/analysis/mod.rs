//! Feedback aggregation modules.

pub mod aggregator;

pub use aggregator::*;
