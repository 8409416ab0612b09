//! Evaluation report schema.
//!
//! This is what one evaluation hands back to its caller and what the JSON
//! output writes to disk. Schema is versioned to allow future evolution.

use crate::aggregator::{GroupShare, InstructionCount, Reducer};
use crate::store::BenchmarkId;
use serde::{Deserialize, Serialize};

/// Complete result of evaluating one benchmark selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Benchmarks evaluated together
    pub benchmark_ids: Vec<BenchmarkId>,

    /// Operation shared by the benchmarks ("sign", "verify", ...)
    pub operation: String,

    /// Number of iterations reduced
    pub iterations: usize,

    /// Statistic used for the per-function table
    pub statistic: Reducer,

    /// Overall cycle statistics
    pub cycles: CycleSummary,

    /// Group percentages, largest first, 0% groups left out
    pub groups: Vec<GroupShare>,

    /// Per-function table, largest total first
    pub functions: Vec<FunctionRow>,

    /// Median instruction counts, most frequent first
    pub instruction_histogram: Vec<InstructionCount>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Total cycles per iteration, summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub mean: u64,
    pub median: u64,
    pub std_dev: u64,
}

/// One row of the per-function table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRow {
    pub function: String,

    /// Functional group of the function
    pub group: String,

    /// Representative call count per iteration
    pub calls: u64,

    pub cycles: u64,
    pub stalls: u64,

    /// cycles + stalls
    pub total: u64,

    /// total / calls
    pub per_call: u64,

    /// Cycles with every iteration first divided by the mean call count
    pub per_call_cycles: f64,

    /// Stalls with every iteration first divided by the mean call count
    pub per_call_stalls: f64,
}
