//! Aggregation of loaded traces into attributions and statistics.
//!
//! This module transforms loaded benchmark traces into:
//! - Per-iteration, per-function cycle attribution (lossless)
//! - An instruction histogram
//! - Cross-iteration statistics, optionally per call
//! - Functional group rollups

pub mod attribution;
pub mod histogram;
pub mod reducer;
pub mod rollup;
pub mod stats;

// Re-export main types and functions
pub use attribution::{attribute, attribute_iteration, Attribution, CycleAccounting, FunctionCycles};
pub use histogram::{instruction_histogram, InstructionCount};
pub use reducer::Reducer;
pub use rollup::{roll_up, GroupRollup, GroupShare, GroupTotal};
pub use stats::{cycles_statistic, per_function_statistic, representative_calls, FunctionStat};
