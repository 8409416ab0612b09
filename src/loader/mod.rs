//! Trace loading.
//!
//! This module handles:
//! - Validating that a selection describes one operation
//! - Reshaping store rows into per-iteration counters
//! - Collecting per-function call counts

pub mod schema;
pub mod trace_loader;

// Re-export main types
pub use schema::{
    BenchmarkSelection, CallCounts, CounterPair, InstructionCounters, IterationTrace, LoadedTrace,
};
pub use trace_loader::load_trace;
