//! AI report synthesis for a single session.
//!
//! Builds a prompt from aggregated scores and participant comments, calls
//! the Gemini API with a fixed JSON response schema, and parses the result
//! into a [`crate::models::SessionInsight`].

pub mod engine;
pub mod prompt;

pub use engine::{InsightConfig, InsightEngine, InsightError};
