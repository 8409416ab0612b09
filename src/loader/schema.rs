//! In-memory shapes produced by the trace loader.

use crate::store::{BenchmarkId, IterationId};
use crate::utils::error::LoadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

/// An instruction count together with the stall cycles it caused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterPair {
    pub count: u64,
    pub stalls: u64,
}

impl CounterPair {
    pub fn new(count: u64, stalls: u64) -> Self {
        Self { count, stalls }
    }

    /// Count plus stalls
    pub fn total(&self) -> u64 {
        self.count + self.stalls
    }
}

impl Add for CounterPair {
    type Output = CounterPair;

    fn add(self, rhs: CounterPair) -> CounterPair {
        CounterPair {
            count: self.count + rhs.count,
            stalls: self.stalls + rhs.stalls,
        }
    }
}

impl AddAssign for CounterPair {
    fn add_assign(&mut self, rhs: CounterPair) {
        self.count += rhs.count;
        self.stalls += rhs.stalls;
    }
}

/// Instruction name -> counters, for one function in one iteration
pub type InstructionCounters = BTreeMap<String, CounterPair>;

/// Benchmark ids evaluated together.
///
/// All ids must describe the same operation; that is checked against the
/// store when the selection is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSelection(Vec<BenchmarkId>);

impl BenchmarkSelection {
    /// Build a selection, rejecting an empty id list
    pub fn new(ids: Vec<BenchmarkId>) -> Result<Self, LoadError> {
        if ids.is_empty() {
            return Err(LoadError::NoData(ids));
        }
        Ok(Self(ids))
    }

    /// Selection holding a single benchmark
    pub fn single(id: BenchmarkId) -> Self {
        Self(vec![id])
    }

    pub fn ids(&self) -> &[BenchmarkId] {
        &self.0
    }
}

/// Raw counters of one iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationTrace {
    /// Ground-truth cycle count of the whole iteration
    pub total_cycles: u64,

    /// Function name -> instruction name -> counters
    pub functions: BTreeMap<String, InstructionCounters>,
}

/// Observed call counts per function, one entry per recorded iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallCounts(BTreeMap<String, Vec<u64>>);

impl CallCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a function's call counts, inserting an empty list on miss
    pub fn entry_or_default(&mut self, function: &str) -> &mut Vec<u64> {
        self.0.entry(function.to_string()).or_default()
    }

    /// Append one observation
    pub fn record(&mut self, function: &str, count: u64) {
        self.entry_or_default(function).push(count);
    }

    /// Replace whatever was recorded for a function
    pub fn set(&mut self, function: &str, counts: Vec<u64>) {
        self.0.insert(function.to_string(), counts);
    }

    pub fn get(&self, function: &str) -> Option<&[u64]> {
        self.0.get(function).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Everything the attribution engine needs for one selection
#[derive(Debug, Clone)]
pub struct LoadedTrace {
    pub selection: BenchmarkSelection,

    /// Operation shared by every benchmark in the selection
    pub operation: String,

    /// Iterations ordered by id
    pub iterations: BTreeMap<IterationId, IterationTrace>,

    pub call_counts: CallCounts,
}

impl LoadedTrace {
    /// Recorded total cycles in iteration order
    pub fn total_cycles(&self) -> Vec<u64> {
        self.iterations.values().map(|it| it.total_cycles).collect()
    }
}
