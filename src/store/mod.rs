//! Read-only access to recorded benchmark data.
//!
//! The evaluator never talks to a storage backend directly. It asks the four
//! questions of [`TraceStore`] and works on the returned rows.

pub mod database;
pub mod schema;
pub mod sqlite;

pub use database::TraceDatabase;
pub use sqlite::SqliteStore;
pub use schema::{BenchmarkId, BenchmarkRow, CallRow, CounterRow, CycleRow, IterationId, IterationRow};

use crate::utils::error::StoreError;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Query surface the loader needs from a benchmark store.
///
/// Every query is scoped to a set of benchmark ids and only returns rows that
/// belong to iterations of those benchmarks. Implementations must not mutate
/// shared state, so one store can serve concurrent evaluations.
pub trait TraceStore: Send + Sync {
    /// Operation of every benchmark among `ids` that the store knows
    fn benchmark_operations(
        &self,
        ids: &[BenchmarkId],
    ) -> Result<BTreeMap<BenchmarkId, String>, StoreError>;

    /// Distinct operations recorded for the given benchmarks
    fn operations_of(&self, ids: &[BenchmarkId]) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.benchmark_operations(ids)?.into_values().collect())
    }

    /// Total cycles of every iteration of the given benchmarks
    fn total_cycles_by_iteration(&self, ids: &[BenchmarkId]) -> Result<Vec<CycleRow>, StoreError>;

    /// Per-function, per-instruction counters of every iteration
    fn function_instruction_counters(
        &self,
        ids: &[BenchmarkId],
    ) -> Result<Vec<CounterRow>, StoreError>;

    /// Observed call counts of every callee
    fn call_counts(&self, ids: &[BenchmarkId]) -> Result<Vec<CallRow>, StoreError>;
}

/// Open a store file, picking the backend from its extension
///
/// `.json` files are read as a [`TraceDatabase`] dump; anything else is
/// opened as the runner's SQLite database.
///
/// **Public** - used by the evaluate command
pub fn open_store(path: impl AsRef<Path>) -> Result<Box<dyn TraceStore>, StoreError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        debug!("Reading {} as a JSON store dump", path.display());
        Ok(Box::new(TraceDatabase::open(path)?))
    } else {
        debug!("Reading {} as a SQLite database", path.display());
        Ok(Box::new(SqliteStore::open(path)?))
    }
}
