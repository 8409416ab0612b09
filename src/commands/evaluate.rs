//! Evaluate command implementation.
//!
//! The evaluate command:
//! 1. Opens the benchmark store
//! 2. Resolves the function classification
//! 3. Evaluates every benchmark id (or all ids as one selection)
//! 4. Writes the text report, and the JSON report if requested

use crate::aggregator::{CycleAccounting, Reducer};
use crate::classification::{load_classification, Classification};
use crate::loader::BenchmarkSelection;
use crate::output::{render_text, write_report_json, write_text};
use crate::report::{evaluate, evaluate_each, EvaluationOptions, EvaluationReport};
use crate::store::{open_store, BenchmarkId};
use crate::utils::config::DEFAULT_OUTPUT_FILE;
use crate::utils::error::EvalError;
use anyhow::{Context, Result};
use log::{error, info};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the evaluate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct EvaluateArgs {
    /// Benchmark store (SQLite database or `.json` dump)
    pub store_path: PathBuf,

    /// Benchmarks to evaluate
    pub benchmark_ids: Vec<BenchmarkId>,

    /// Output path for the text report
    pub output_text: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Classification TOML (None = built-in Dilithium table)
    pub groups: Option<PathBuf>,

    /// Statistic for the per-function table
    pub statistic: Reducer,

    /// What the recorded total cycles are compared against
    pub accounting: CycleAccounting,

    /// Evaluate all ids as one selection
    pub combine: bool,
}

impl Default for EvaluateArgs {
    fn default() -> Self {
        Self {
            store_path: PathBuf::new(),
            benchmark_ids: Vec::new(),
            output_text: PathBuf::from(DEFAULT_OUTPUT_FILE),
            output_json: None,
            groups: None,
            statistic: Reducer::default(),
            accounting: CycleAccounting::default(),
            combine: false,
        }
    }
}

/// Outcome of a batch of evaluations
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Number of evaluations that produced a report
    pub succeeded: usize,

    /// (selection label, error message) of every failed evaluation
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Execute the evaluate command
///
/// **Public** - main entry point called from main.rs
///
/// A failing benchmark id is logged and recorded in the returned summary;
/// the remaining ids are still evaluated and written.
///
/// # Errors
/// * Store or classification cannot be loaded
/// * Output files cannot be written
pub fn execute_evaluate(args: &EvaluateArgs) -> Result<BatchSummary> {
    let start_time = Instant::now();

    info!(
        "Evaluating {} benchmark(s) from {}",
        args.benchmark_ids.len(),
        args.store_path.display()
    );

    let store = open_store(&args.store_path)
        .with_context(|| format!("Failed to open store {}", args.store_path.display()))?;

    let classification = resolve_classification(args.groups.as_ref())?;

    let options = EvaluationOptions {
        statistic: args.statistic,
        accounting: args.accounting,
    };

    let results: Vec<(String, Result<EvaluationReport, EvalError>)> = if args.combine {
        let selection = BenchmarkSelection::new(args.benchmark_ids.clone())?;
        vec![(
            selection_label(selection.ids()),
            evaluate(store.as_ref(), &selection, &classification, &options),
        )]
    } else {
        evaluate_each(store.as_ref(), &args.benchmark_ids, &classification, &options)
            .into_iter()
            .map(|(id, result)| (id.to_string(), result))
            .collect()
    };

    let source = args.store_path.display().to_string();
    let mut summary = BatchSummary::default();
    let mut text = String::new();
    let mut reports = Vec::new();

    for (label, result) in results {
        match result {
            Ok(report) => {
                text.push_str(&render_text(&report, &source));
                reports.push(report);
                summary.succeeded += 1;
            }
            Err(e) => {
                error!("Evaluation of index {} failed: {}", label, e);
                text.push_str(&format!(" --- index {} in {}: FAILED: {} ---\n\n\n", label, source, e));
                summary.failed.push((label, e.to_string()));
            }
        }
    }

    write_text(&text, &args.output_text).context("Failed to write text report")?;
    info!("✓ Text report written to: {}", args.output_text.display());

    if let Some(json_path) = &args.output_json {
        write_report_json(&reports, json_path).context("Failed to write JSON report")?;
        info!("✓ JSON report written to: {}", json_path.display());
    }

    let elapsed = start_time.elapsed();
    info!(
        "Evaluation completed in {:.2}s: {} succeeded, {} failed",
        elapsed.as_secs_f64(),
        summary.succeeded,
        summary.failed.len()
    );

    Ok(summary)
}

/// Load the classification file, or fall back to the built-in table
///
/// **Public** - shared with the groups command
pub fn resolve_classification(path: Option<&PathBuf>) -> Result<Classification> {
    match path {
        Some(path) => load_classification(path)
            .with_context(|| format!("Failed to load classification {}", path.display())),
        None => Classification::dilithium().context("Built-in classification is invalid"),
    }
}

/// Validate evaluate arguments
///
/// **Public** - can be called before execute_evaluate for early validation
pub fn validate_args(args: &EvaluateArgs) -> Result<()> {
    if args.store_path.as_os_str().is_empty() {
        anyhow::bail!("Store path cannot be empty");
    }

    if args.benchmark_ids.is_empty() {
        anyhow::bail!("At least one benchmark id is required");
    }

    let mut seen = HashSet::new();
    for id in &args.benchmark_ids {
        if !seen.insert(id) {
            anyhow::bail!("Benchmark id {} is given more than once", id);
        }
    }

    if args.output_text.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}

fn selection_label(ids: &[BenchmarkId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
