//! Dilithium Bench Eval
//!
//! Cycle attribution and summary statistics for performance-counter traces
//! captured from repeated Dilithium benchmark runs.
//!
//! Data flows one way: [`loader`] turns store rows into per-iteration
//! counters, [`aggregator`] attributes cycles to functions and reduces them
//! across iterations, [`report`] assembles the result and [`output`]
//! renders it.
//!
//! ```ignore
//! use dilithium_bench_eval::classification::Classification;
//! use dilithium_bench_eval::loader::BenchmarkSelection;
//! use dilithium_bench_eval::report::{evaluate, EvaluationOptions};
//! use dilithium_bench_eval::store::SqliteStore;
//!
//! let store = SqliteStore::open("dilithium_bench.db")?;
//! let report = evaluate(
//!     &store,
//!     &BenchmarkSelection::single(1),
//!     &Classification::dilithium()?,
//!     &EvaluationOptions::default(),
//! )?;
//! ```

pub mod aggregator;
pub mod classification;
pub mod commands;
pub mod loader;
pub mod output;
pub mod report;
pub mod store;
pub mod utils;
