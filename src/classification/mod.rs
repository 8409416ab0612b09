//! Functional-group classification of benchmark functions.
//!
//! Classifications are plain configuration passed into the rollup, so
//! several schemes can coexist in one process.
//!
//! # Example
//! ```ignore
//! use dilithium_bench_eval::classification::{load_classification, Classification};
//!
//! let builtin = Classification::dilithium()?;
//! let custom = load_classification("groups.toml")?;
//! ```

mod dilithium;
mod table;

// Public API exports
pub use table::{load_classification, Classification, GroupSpec};
