//! Per-iteration cycle attribution.
//!
//! Each function's cycles are the summed instruction counts recorded under
//! it. Status-register reads are moved to the synthetic `SHAKE` function
//! before summing, and every iteration must account for exactly the cycles
//! the benchmark recorded for it.

use crate::loader::{CounterPair, IterationTrace, LoadedTrace};
use crate::store::IterationId;
use crate::utils::config::{SHAKE_FUNCTION, STATUS_REGISTER_READ};
use crate::utils::error::AttributionError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Function name -> (cycles, stalls) for one iteration.
///
/// `CounterPair::count` holds the cycles: in these traces one counted
/// instruction is one cycle.
pub type FunctionCycles = BTreeMap<String, CounterPair>;

/// What the recorded total cycles of an iteration is compared against
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CycleAccounting {
    /// Sum of attributed cycles
    #[default]
    Instructions,

    /// Sum of attributed cycles plus stalls
    InstructionsWithStalls,
}

impl CycleAccounting {
    /// Cycles a single attribution entry contributes to the iteration total
    pub fn charged(&self, pair: &CounterPair) -> u64 {
        match self {
            CycleAccounting::Instructions => pair.count,
            CycleAccounting::InstructionsWithStalls => pair.total(),
        }
    }
}

/// Per-iteration, per-function attribution of a whole selection
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    iterations: BTreeMap<IterationId, FunctionCycles>,
    function_names: Vec<String>,
}

impl Attribution {
    /// Attribution of every iteration, ordered by iteration id
    pub fn iterations(&self) -> &BTreeMap<IterationId, FunctionCycles> {
        &self.iterations
    }

    pub fn iteration(&self, id: IterationId) -> Option<&FunctionCycles> {
        self.iterations.get(&id)
    }

    /// Function names present in every iteration, sorted
    pub fn function_names(&self) -> &[String] {
        &self.function_names
    }

    /// A function's (cycles, stalls) across iterations, in iteration order
    pub fn series(&self, function: &str) -> Vec<CounterPair> {
        self.iterations
            .values()
            .filter_map(|cycles| cycles.get(function).copied())
            .collect()
    }
}

/// Attribute cycles of every iteration in a loaded trace
///
/// **Public** - main entry point for attribution
///
/// # Errors
/// * `AttributionError::InconsistentFunctions` - iterations record different functions
/// * `AttributionError::CycleMismatch` - attributed cycles differ from the recorded total
pub fn attribute(
    trace: &LoadedTrace,
    accounting: CycleAccounting,
) -> Result<Attribution, AttributionError> {
    check_function_sets(trace)?;

    let mut iterations = BTreeMap::new();
    for (&id, iteration) in &trace.iterations {
        let cycles = attribute_iteration(iteration);
        verify_lossless(id, iteration.total_cycles, &cycles, accounting)?;
        iterations.insert(id, cycles);
    }

    // SHAKE only shows up where the marker was hit; give it a zero elsewhere
    // so every iteration carries the same functions.
    let shake_seen = iterations
        .values()
        .any(|cycles: &FunctionCycles| cycles.contains_key(SHAKE_FUNCTION));
    if shake_seen {
        for cycles in iterations.values_mut() {
            cycles.entry(SHAKE_FUNCTION.to_string()).or_default();
        }
    }

    let function_names: Vec<String> = iterations
        .values()
        .next()
        .map(|cycles: &FunctionCycles| cycles.keys().cloned().collect())
        .unwrap_or_default();

    debug!(
        "Attributed {} iterations across {} functions",
        iterations.len(),
        function_names.len()
    );

    Ok(Attribution {
        iterations,
        function_names,
    })
}

/// Sum one iteration's counters per function, moving status-register reads to SHAKE
///
/// **Public** - usable on a single iteration for inspection and tests
pub fn attribute_iteration(iteration: &IterationTrace) -> FunctionCycles {
    let mut cycles = FunctionCycles::new();

    for (function, instructions) in &iteration.functions {
        let mut own = CounterPair::default();
        let mut shake = None;

        for (instruction, pair) in instructions {
            if instruction == STATUS_REGISTER_READ {
                shake = Some(*pair);
            } else {
                own += *pair;
            }
        }

        *cycles.entry(function.clone()).or_default() += own;

        if let Some(pair) = shake {
            *cycles.entry(SHAKE_FUNCTION.to_string()).or_default() += pair;
        }
    }

    cycles
}

/// Check that no cycle was lost or counted twice
///
/// **Public** - the invariant every attributed iteration satisfies
pub fn verify_lossless(
    iteration: IterationId,
    expected: u64,
    cycles: &FunctionCycles,
    accounting: CycleAccounting,
) -> Result<(), AttributionError> {
    let attributed: u64 = cycles.values().map(|pair| accounting.charged(pair)).sum();

    if attributed != expected {
        return Err(AttributionError::CycleMismatch {
            iteration,
            expected,
            attributed,
        });
    }

    Ok(())
}

/// Every iteration must record the same functions as the first one
///
/// **Private** - internal helper for attribute
fn check_function_sets(trace: &LoadedTrace) -> Result<(), AttributionError> {
    let mut iter = trace.iterations.values();
    let Some(first) = iter.next() else {
        return Ok(());
    };
    let expected: Vec<&String> = first.functions.keys().collect();

    for (&id, iteration) in &trace.iterations {
        let found: Vec<&String> = iteration.functions.keys().collect();
        if found != expected {
            return Err(AttributionError::InconsistentFunctions {
                iteration: id,
                expected: expected.iter().map(|s| s.to_string()).collect(),
                found: found.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    Ok(())
}
