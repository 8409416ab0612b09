//! JSON report writer.
//!
//! Writes a batch of evaluation reports as one pretty-printed JSON array.

use super::{ensure_parent, validate_path};
use crate::report::EvaluationReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write reports to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report_json(
    reports: &[EvaluationReport],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!(
        "Writing {} report(s) to: {}",
        reports.len(),
        output_path.display()
    );

    validate_path(output_path)?;
    ensure_parent(output_path)?;

    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, reports)?;

    Ok(())
}

/// Read reports back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_report_json(input_path: impl AsRef<Path>) -> Result<Vec<EvaluationReport>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading reports from: {}", input_path.display());

    let file = File::open(input_path)?;
    let reports: Vec<EvaluationReport> = serde_json::from_reader(file)?;

    debug!("Loaded {} report(s)", reports.len());

    Ok(reports)
}
