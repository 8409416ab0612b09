//! Plain-text report rendering.
//!
//! Renders one report as four column-aligned tables: overall cycle
//! statistics, group percentages, the per-function table and the
//! instruction histogram.

use super::{ensure_parent, validate_path};
use crate::report::EvaluationReport;
use crate::utils::error::OutputError;
use log::info;
use std::fmt::Write as _;
use std::path::Path;

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Render one report
///
/// **Public** - main entry point for text output
///
/// # Arguments
/// * `report` - Evaluation to render
/// * `source` - Name of the store the report came from, shown in the header
pub fn render_text(report: &EvaluationReport, source: &str) -> String {
    let ids: Vec<String> = report.benchmark_ids.iter().map(|id| id.to_string()).collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        " --- {}: index {} in {} ---",
        report.operation,
        ids.join(","),
        source
    );

    out.push_str("\nOverall Stats\n");
    out.push_str(&table(
        &[("Metric", Align::Left), ("Cycles", Align::Right)],
        &[
            vec!["Mean".to_string(), report.cycles.mean.to_string()],
            vec!["Median".to_string(), report.cycles.median.to_string()],
            vec!["Std. Dev.".to_string(), report.cycles.std_dev.to_string()],
        ],
    ));

    out.push_str("\nGroup Percentages\n");
    let group_rows: Vec<Vec<String>> = report
        .groups
        .iter()
        .map(|g| vec![g.group.clone(), g.percentage.to_string()])
        .collect();
    out.push_str(&table(
        &[("Group", Align::Left), ("Percentage", Align::Right)],
        &group_rows,
    ));

    out.push_str("\nPer Function Statistics (accumulated)\n");
    let function_rows: Vec<Vec<String>> = report
        .functions
        .iter()
        .map(|f| {
            vec![
                f.function.clone(),
                f.calls.to_string(),
                f.cycles.to_string(),
                f.stalls.to_string(),
                f.total.to_string(),
                f.per_call.to_string(),
            ]
        })
        .collect();
    out.push_str(&table(
        &[
            ("Function", Align::Left),
            ("Calls", Align::Right),
            ("Instructions", Align::Right),
            ("Stall", Align::Right),
            ("Total", Align::Right),
            ("Per Call", Align::Right),
        ],
        &function_rows,
    ));

    out.push_str("\nInstruction Histogram\n");
    let histogram_rows: Vec<Vec<String>> = report
        .instruction_histogram
        .iter()
        .map(|h| vec![h.instruction.clone(), h.count.to_string()])
        .collect();
    out.push_str(&table(
        &[("Instruction", Align::Left), ("Count", Align::Right)],
        &histogram_rows,
    ));

    out.push_str("\n\n");
    out
}

/// Write rendered text to a file
pub fn write_text(contents: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    validate_path(output_path)?;
    ensure_parent(output_path)?;
    std::fs::write(output_path, contents)?;

    info!(
        "Text report written to: {} ({} bytes)",
        output_path.display(),
        contents.len()
    );

    Ok(())
}

/// Lay out a table with a dashed rule under the header
///
/// **Private** - internal helper for render_text
fn table(columns: &[(&str, Align)], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, (header, _))| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |cells: Vec<String>| -> String {
        cells.join("  ").trim_end().to_string()
    };

    out.push_str(&line(
        columns
            .iter()
            .zip(&widths)
            .map(|((header, align), &w)| pad(header, w, *align))
            .collect(),
    ));
    out.push('\n');

    out.push_str(&line(widths.iter().map(|&w| "-".repeat(w)).collect()));
    out.push('\n');

    for row in rows {
        out.push_str(&line(
            columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, ((_, align), &w))| {
                    pad(row.get(i).map(String::as_str).unwrap_or(""), w, *align)
                })
                .collect(),
        ));
        out.push('\n');
    }

    out
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", cell, width = width),
        Align::Right => format!("{:>width$}", cell, width = width),
    }
}
