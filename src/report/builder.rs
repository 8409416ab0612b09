//! Runs one evaluation end to end: load, attribute, reduce, group.

use super::schema::{CycleSummary, EvaluationReport, FunctionRow};
use crate::aggregator::reducer::to_count;
use crate::aggregator::{
    attribute, cycles_statistic, instruction_histogram, per_function_statistic,
    representative_calls, roll_up, CycleAccounting, FunctionStat, Reducer,
};
use crate::classification::Classification;
use crate::loader::{load_trace, BenchmarkSelection, CallCounts, CounterPair, LoadedTrace};
use crate::store::{BenchmarkId, TraceStore};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::{EvalError, StatsError};
use log::{debug, info};
use std::collections::BTreeMap;

/// Knobs of one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Reducer for the per-function table and the call counts
    pub statistic: Reducer,

    /// How the lossless check counts stalls
    pub accounting: CycleAccounting,
}

/// Evaluate one benchmark selection
///
/// **Public** - main entry point of the library
///
/// # Arguments
/// * `store` - Read-only benchmark store
/// * `selection` - Benchmarks describing the same operation
/// * `classification` - Function -> group table for the breakdown
/// * `options` - Statistic and cycle accounting
///
/// # Errors
/// Any load, attribution, statistic or grouping failure. Nothing partial is
/// returned.
pub fn evaluate<S: TraceStore + ?Sized>(
    store: &S,
    selection: &BenchmarkSelection,
    classification: &Classification,
    options: &EvaluationOptions,
) -> Result<EvaluationReport, EvalError> {
    info!("Step 1/4: Loading benchmarks {:?}...", selection.ids());
    let trace = load_trace(store, selection)?;

    info!(
        "Step 2/4: Attributing cycles of {} iterations...",
        trace.iterations.len()
    );
    let attribution = attribute(&trace, options.accounting)?;
    let instruction_histogram = instruction_histogram(&trace)?;

    info!("Step 3/4: Reducing with {}...", options.statistic.label());
    let cycles = summarize_cycles(&trace)?;

    let per_function: BTreeMap<String, CounterPair> =
        per_function_statistic(&attribution, &trace.call_counts, options.statistic, false)?
            .into_iter()
            .map(|(function, stat)| (function, stat.rounded()))
            .collect();
    let per_call =
        per_function_statistic(&attribution, &trace.call_counts, options.statistic, true)?;

    info!("Step 4/4: Grouping {} functions...", per_function.len());
    let rollup = roll_up(&per_function, classification)?;
    let groups = rollup.shares()?;

    let functions = function_rows(
        &per_function,
        &per_call,
        &trace.call_counts,
        classification,
        options.statistic,
    )?;

    debug!(
        "Evaluation of '{}' done: {} groups, {} functions, {} instruction types",
        trace.operation,
        groups.len(),
        functions.len(),
        instruction_histogram.len()
    );

    Ok(EvaluationReport {
        version: SCHEMA_VERSION.to_string(),
        benchmark_ids: selection.ids().to_vec(),
        operation: trace.operation.clone(),
        iterations: trace.iterations.len(),
        statistic: options.statistic,
        cycles,
        groups,
        functions,
        instruction_histogram,
        generated_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Evaluate every benchmark id on its own.
///
/// A failing id does not stop the others; its error is returned in place.
pub fn evaluate_each<S: TraceStore + ?Sized>(
    store: &S,
    ids: &[BenchmarkId],
    classification: &Classification,
    options: &EvaluationOptions,
) -> Vec<(BenchmarkId, Result<EvaluationReport, EvalError>)> {
    ids.iter()
        .map(|&id| {
            let selection = BenchmarkSelection::single(id);
            (id, evaluate(store, &selection, classification, options))
        })
        .collect()
}

/// Mean, median and standard deviation of total cycles
///
/// **Private** - internal helper for evaluate
fn summarize_cycles(trace: &LoadedTrace) -> Result<CycleSummary, StatsError> {
    Ok(CycleSummary {
        mean: to_count(cycles_statistic(trace, Reducer::Mean)?),
        median: to_count(cycles_statistic(trace, Reducer::Median)?),
        std_dev: to_count(cycles_statistic(trace, Reducer::StdDev)?),
    })
}

/// Build the per-function table, largest total first
///
/// **Private** - internal helper for evaluate
fn function_rows(
    per_function: &BTreeMap<String, CounterPair>,
    per_call: &BTreeMap<String, FunctionStat>,
    calls: &CallCounts,
    classification: &Classification,
    statistic: Reducer,
) -> Result<Vec<FunctionRow>, EvalError> {
    let mut rows = Vec::with_capacity(per_function.len());

    for (function, pair) in per_function {
        let representative = representative_calls(calls, function, statistic)?;
        let normalized = per_call.get(function).copied().unwrap_or_default();

        rows.push(FunctionRow {
            function: function.clone(),
            group: classification.group_of(function)?.to_string(),
            calls: representative,
            cycles: pair.count,
            stalls: pair.stalls,
            total: pair.total(),
            per_call: to_count(pair.total() as f64 / representative as f64),
            per_call_cycles: normalized.cycles,
            per_call_stalls: normalized.stalls,
        });
    }

    // Stable sort keeps the name order for ties
    rows.sort_by(|a, b| b.total.cmp(&a.total));

    Ok(rows)
}
