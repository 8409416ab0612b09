//! Evaluation reports.
//!
//! Composes loader, attribution and statistics into the structured result
//! handed back to callers. Rendering is left to `output`.

pub mod builder;
pub mod schema;

pub use builder::{evaluate, evaluate_each, EvaluationOptions};
pub use schema::{CycleSummary, EvaluationReport, FunctionRow};
