//! Row types of the benchmark store.
//!
//! These mirror the tables the benchmark runner fills in. Field names match
//! the column names so a store dump can be read without renaming.

use serde::{Deserialize, Serialize};

/// Identifier of one benchmark run (a batch of iterations)
pub type BenchmarkId = i64;

/// Identifier of one iteration, unique across the whole store
pub type IterationId = i64;

/// A benchmark and the operation it measured ("sign", "verify", "keypair")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub id: BenchmarkId,
    pub operation: String,
}

/// Links an iteration to its parent benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRow {
    pub id: IterationId,
    pub benchmark_id: BenchmarkId,
}

/// Ground-truth cycle count of one iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRow {
    #[serde(alias = "benchmark_iteration_id")]
    pub iteration_id: IterationId,
    pub cycles: u64,
}

/// Instruction and stall counters of one instruction inside one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRow {
    #[serde(alias = "benchmark_iteration_id")]
    pub iteration_id: IterationId,
    pub func_name: String,
    pub instr_name: String,
    pub instr_count: u64,
    pub stall_count: u64,
}

/// Number of times a callee was entered during one iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRow {
    #[serde(alias = "benchmark_iteration_id")]
    pub iteration_id: IterationId,
    pub callee_func_name: String,
    pub call_count: u64,
}
