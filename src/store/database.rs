//! JSON-file-backed benchmark store.
//!
//! Holds the five tables written by the benchmark runner and answers
//! [`TraceStore`] queries by joining through `iterations.benchmark_id`.

use super::schema::{
    BenchmarkId, BenchmarkRow, CallRow, CounterRow, CycleRow, IterationId, IterationRow,
};
use super::TraceStore;
use crate::utils::error::StoreError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// In-memory copy of a benchmark store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceDatabase {
    #[serde(default)]
    pub benchmarks: Vec<BenchmarkRow>,

    #[serde(default, alias = "benchmark_iteration")]
    pub iterations: Vec<IterationRow>,

    #[serde(default)]
    pub cycles: Vec<CycleRow>,

    #[serde(default)]
    pub func_instrs: Vec<CounterRow>,

    #[serde(default)]
    pub func_calls: Vec<CallRow>,
}

impl TraceDatabase {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store dump from disk
    ///
    /// # Errors
    /// * `StoreError::Io` - file cannot be read
    /// * `StoreError::Json` - file is not a valid store dump
    /// * `StoreError::Malformed` - tables reference each other inconsistently
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Opening benchmark store: {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let db: TraceDatabase = serde_json::from_reader(reader)?;
        db.validate()?;

        debug!(
            "Store loaded: {} benchmarks, {} iterations, {} counter rows, {} call rows",
            db.benchmarks.len(),
            db.iterations.len(),
            db.func_instrs.len(),
            db.func_calls.len()
        );

        Ok(db)
    }

    /// Write the store to disk as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Check referential integrity between benchmarks and iterations
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut benchmark_ids = HashSet::new();
        for bench in &self.benchmarks {
            if !benchmark_ids.insert(bench.id) {
                return Err(StoreError::Malformed(format!(
                    "duplicate benchmark id {}",
                    bench.id
                )));
            }
        }

        let mut iteration_ids = HashSet::new();
        for iteration in &self.iterations {
            if !iteration_ids.insert(iteration.id) {
                return Err(StoreError::Malformed(format!(
                    "duplicate iteration id {}",
                    iteration.id
                )));
            }
            if !benchmark_ids.contains(&iteration.benchmark_id) {
                return Err(StoreError::Malformed(format!(
                    "iteration {} belongs to unknown benchmark {}",
                    iteration.id, iteration.benchmark_id
                )));
            }
        }

        Ok(())
    }

    /// Register a benchmark
    pub fn add_benchmark(&mut self, id: BenchmarkId, operation: impl Into<String>) -> &mut Self {
        self.benchmarks.push(BenchmarkRow {
            id,
            operation: operation.into(),
        });
        self
    }

    /// Register an iteration together with its recorded total cycles
    pub fn add_iteration(
        &mut self,
        benchmark_id: BenchmarkId,
        iteration_id: IterationId,
        cycles: u64,
    ) -> &mut Self {
        self.iterations.push(IterationRow {
            id: iteration_id,
            benchmark_id,
        });
        self.cycles.push(CycleRow {
            iteration_id,
            cycles,
        });
        self
    }

    /// Record the counters of one instruction inside one function
    pub fn add_counter(
        &mut self,
        iteration_id: IterationId,
        func_name: impl Into<String>,
        instr_name: impl Into<String>,
        instr_count: u64,
        stall_count: u64,
    ) -> &mut Self {
        self.func_instrs.push(CounterRow {
            iteration_id,
            func_name: func_name.into(),
            instr_name: instr_name.into(),
            instr_count,
            stall_count,
        });
        self
    }

    /// Record how often a callee was entered during an iteration
    pub fn add_call(
        &mut self,
        iteration_id: IterationId,
        callee: impl Into<String>,
        call_count: u64,
    ) -> &mut Self {
        self.func_calls.push(CallRow {
            iteration_id,
            callee_func_name: callee.into(),
            call_count,
        });
        self
    }

    /// Iterations that belong to any of the given benchmarks
    fn selected_iterations(&self, ids: &[BenchmarkId]) -> HashSet<IterationId> {
        self.iterations
            .iter()
            .filter(|it| ids.contains(&it.benchmark_id))
            .map(|it| it.id)
            .collect()
    }
}

impl TraceStore for TraceDatabase {
    fn benchmark_operations(
        &self,
        ids: &[BenchmarkId],
    ) -> Result<BTreeMap<BenchmarkId, String>, StoreError> {
        Ok(self
            .benchmarks
            .iter()
            .filter(|b| ids.contains(&b.id))
            .map(|b| (b.id, b.operation.clone()))
            .collect())
    }

    fn total_cycles_by_iteration(&self, ids: &[BenchmarkId]) -> Result<Vec<CycleRow>, StoreError> {
        let selected = self.selected_iterations(ids);
        Ok(self
            .cycles
            .iter()
            .filter(|row| selected.contains(&row.iteration_id))
            .cloned()
            .collect())
    }

    fn function_instruction_counters(
        &self,
        ids: &[BenchmarkId],
    ) -> Result<Vec<CounterRow>, StoreError> {
        let selected = self.selected_iterations(ids);
        Ok(self
            .func_instrs
            .iter()
            .filter(|row| selected.contains(&row.iteration_id))
            .cloned()
            .collect())
    }

    fn call_counts(&self, ids: &[BenchmarkId]) -> Result<Vec<CallRow>, StoreError> {
        let selected = self.selected_iterations(ids);
        Ok(self
            .func_calls
            .iter()
            .filter(|row| selected.contains(&row.iteration_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn two_benchmarks() -> TraceDatabase {
        let mut db = TraceDatabase::new();
        db.add_benchmark(1, "sign")
            .add_benchmark(2, "verify")
            .add_iteration(1, 10, 100)
            .add_iteration(2, 20, 200)
            .add_counter(10, "main", "add", 100, 0)
            .add_counter(20, "main", "add", 200, 0)
            .add_call(10, "ntt_dilithium", 4)
            .add_call(20, "ntt_dilithium", 8);
        db
    }

    #[test]
    fn test_queries_are_scoped_to_selection() {
        let db = two_benchmarks();

        let cycles = db.total_cycles_by_iteration(&[1]).unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].iteration_id, 10);

        let counters = db.function_instruction_counters(&[2]).unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].instr_count, 200);

        let calls = db.call_counts(&[1, 2]).unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_operations_of() {
        let db = two_benchmarks();
        let ops = db.operations_of(&[1, 2]).unwrap();
        assert_eq!(ops.len(), 2);
        assert!(db.operations_of(&[99]).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_open() {
        let db = two_benchmarks();
        let temp_file = NamedTempFile::new().unwrap();

        db.save(temp_file.path()).unwrap();
        let loaded = TraceDatabase::open(temp_file.path()).unwrap();

        assert_eq!(loaded.benchmarks, db.benchmarks);
        assert_eq!(loaded.func_instrs.len(), 2);
    }

    #[test]
    fn test_validate_rejects_orphan_iteration() {
        let mut db = TraceDatabase::new();
        db.add_benchmark(1, "sign").add_iteration(7, 10, 100);
        assert!(matches!(db.validate(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_iteration() {
        let mut db = TraceDatabase::new();
        db.add_benchmark(1, "sign")
            .add_iteration(1, 10, 100)
            .add_iteration(1, 10, 100);
        assert!(db.validate().is_err());
    }
}
