//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by a trace store while answering a query
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store database query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Malformed store: {0}")]
    Malformed(String),
}

/// Errors that can occur while loading a benchmark selection
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No data for benchmark selection {0:?}")]
    NoData(Vec<i64>),

    #[error("Benchmark selection mixes operations: {0:?}")]
    MixedOperations(Vec<String>),

    #[error("Iteration {0} has instruction counters but no total cycle record")]
    MissingCycles(i64),

    #[error("Iteration {0} has a total cycle record but no instruction counters")]
    MissingCounters(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while attributing cycles to functions
#[derive(Error, Debug)]
pub enum AttributionError {
    #[error("Iteration {iteration}: attributed {attributed} cycles but {expected} were recorded")]
    CycleMismatch {
        iteration: i64,
        expected: u64,
        attributed: u64,
    },

    #[error("Iteration {iteration} records functions {found:?}, expected {expected:?}")]
    InconsistentFunctions {
        iteration: i64,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Degenerate statistic inputs
#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("Statistic requested over an empty sequence")]
    EmptyInput,

    #[error("Statistic needs at least {needed} samples, got {got}")]
    TooFewSamples { needed: usize, got: usize },

    #[error("Function observed zero calls: {0}")]
    ZeroCalls(String),

    #[error("No call-count record for function: {0}")]
    MissingCallCounts(String),

    #[error("Group totals sum to zero")]
    ZeroTotal,
}

/// Errors that can occur while classifying functions into groups
#[derive(Error, Debug)]
pub enum GroupingError {
    #[error("Function is not mapped to any group: {0}")]
    Unmapped(String),

    #[error("Function {function} is listed under both {first} and {second}")]
    DuplicateFunction {
        function: String,
        first: String,
        second: String,
    },

    #[error("Classification TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Any failure of a single evaluation.
///
/// Every variant is local to one selection, so a batch driver can report
/// it and move on to the next benchmark id.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Attribution(#[from] AttributionError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Grouping(#[from] GroupingError),
}
