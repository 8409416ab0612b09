//! Turns store rows into per-iteration counters and call counts.

use super::schema::{BenchmarkSelection, CallCounts, CounterPair, IterationTrace, LoadedTrace};
use crate::store::{BenchmarkId, CallRow, CounterRow, CycleRow, IterationId, TraceStore};
use crate::utils::config::{INTERNAL_SYMBOL_PREFIX, SYNTHETIC_CALLEES};
use crate::utils::error::LoadError;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Load all raw data of a benchmark selection
///
/// **Public** - main entry point for loading
///
/// # Arguments
/// * `store` - Read-only benchmark store
/// * `selection` - Benchmark ids to evaluate together
///
/// # Errors
/// * `LoadError::NoData` - selection is unknown to the store or has no iterations
/// * `LoadError::MixedOperations` - ids describe more than one operation
/// * `LoadError::MissingCycles` / `LoadError::MissingCounters` - an iteration
///   appears in only one of the cycle and counter tables
pub fn load_trace<S: TraceStore + ?Sized>(
    store: &S,
    selection: &BenchmarkSelection,
) -> Result<LoadedTrace, LoadError> {
    let ids = selection.ids();
    debug!("Loading benchmark selection {:?}", ids);

    // Precondition first, before touching any iteration data
    let operation = resolve_operation(store, selection)?;

    let totals = collect_totals(store.total_cycles_by_iteration(ids)?);
    let counters = collect_counters(store.function_instruction_counters(ids)?);

    if totals.is_empty() && counters.is_empty() {
        return Err(LoadError::NoData(ids.to_vec()));
    }

    let iterations = join_iterations(totals, counters)?;
    let call_counts = collect_call_counts(store.call_counts(ids)?);

    debug!(
        "Loaded {} iterations of '{}' with {} called functions",
        iterations.len(),
        operation,
        call_counts.len()
    );

    Ok(LoadedTrace {
        selection: selection.clone(),
        operation,
        iterations,
        call_counts,
    })
}

/// Resolve the single operation shared by the selection
///
/// Every requested id must be known to the store.
///
/// **Private** - internal helper for load_trace
fn resolve_operation<S: TraceStore + ?Sized>(
    store: &S,
    selection: &BenchmarkSelection,
) -> Result<String, LoadError> {
    let known = store.benchmark_operations(selection.ids())?;

    let unknown: Vec<BenchmarkId> = selection
        .ids()
        .iter()
        .copied()
        .filter(|id| !known.contains_key(id))
        .collect();
    if !unknown.is_empty() {
        return Err(LoadError::NoData(unknown));
    }

    let operations: BTreeSet<String> = known.into_values().collect();

    let mut iter = operations.into_iter();
    match (iter.next(), iter.next()) {
        (None, _) => Err(LoadError::NoData(selection.ids().to_vec())),
        (Some(op), None) => Ok(op),
        (Some(first), Some(second)) => {
            let mut ops = vec![first, second];
            ops.extend(iter);
            Err(LoadError::MixedOperations(ops))
        }
    }
}

/// **Private** - internal helper for load_trace
fn collect_totals(rows: Vec<CycleRow>) -> BTreeMap<IterationId, u64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        if let Some(previous) = totals.insert(row.iteration_id, row.cycles) {
            warn!(
                "Iteration {} has several cycle records, keeping {} over {}",
                row.iteration_id, row.cycles, previous
            );
        }
    }
    totals
}

type IterationCounters = BTreeMap<IterationId, IterationTrace>;

/// **Private** - internal helper for load_trace
fn collect_counters(rows: Vec<CounterRow>) -> IterationCounters {
    let mut iterations: IterationCounters = BTreeMap::new();

    for row in rows {
        let instructions = iterations
            .entry(row.iteration_id)
            .or_default()
            .functions
            .entry(row.func_name)
            .or_default();

        let pair = CounterPair::new(row.instr_count, row.stall_count);
        if instructions.insert(row.instr_name.clone(), pair).is_some() {
            warn!(
                "Iteration {}: duplicate counters for instruction '{}', keeping the last",
                row.iteration_id, row.instr_name
            );
        }
    }

    iterations
}

/// Attach total cycles to every iteration that has counters
///
/// **Private** - internal helper for load_trace
fn join_iterations(
    mut totals: BTreeMap<IterationId, u64>,
    mut iterations: IterationCounters,
) -> Result<IterationCounters, LoadError> {
    for (id, trace) in iterations.iter_mut() {
        trace.total_cycles = totals.remove(id).ok_or(LoadError::MissingCycles(*id))?;
    }

    // Anything left has a total but no counters
    if let Some((&id, _)) = totals.iter().next() {
        return Err(LoadError::MissingCounters(id));
    }

    Ok(iterations)
}

/// Gather call counts, skipping helper symbols and pinning the pseudo-functions
///
/// **Private** - internal helper for load_trace
fn collect_call_counts(rows: Vec<CallRow>) -> CallCounts {
    let mut calls = CallCounts::new();

    for row in rows {
        if row.callee_func_name.starts_with(INTERNAL_SYMBOL_PREFIX) {
            continue;
        }
        calls.record(&row.callee_func_name, row.call_count);
    }

    for name in SYNTHETIC_CALLEES {
        calls.set(name, vec![1]);
    }

    calls
}
