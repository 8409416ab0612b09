//! SQLite store written by the benchmark runner.
//!
//! Tables: `benchmark`, `benchmark_iteration`, `cycles`, `func_instrs` and
//! `func_calls`. Every query joins through `benchmark_iteration.benchmark_id`.

use super::schema::{BenchmarkId, CallRow, CounterRow, CycleRow};
use super::TraceStore;
use crate::utils::error::StoreError;
use log::info;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Read-only handle on a runner database (`dilithium_bench.db`)
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open an existing database without write access
    ///
    /// # Errors
    /// * `StoreError::Sqlite` - file is missing or not a SQLite database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!("Opening benchmark database: {}", path.display());

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Fails early on files that are not SQLite databases
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })?;

        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a query whose only parameters are the benchmark ids
    fn query_ids<T>(
        &self,
        sql: &str,
        ids: &[BenchmarkId],
        map: impl Fn(&Row<'_>) -> Result<T, StoreError>,
    ) -> Result<Vec<T>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&sql.replace("{ids}", &placeholders(ids.len())))?;
        let mut rows = stmt.query(params_from_iter(ids.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(map(row)?);
        }
        Ok(out)
    }
}

impl TraceStore for SqliteStore {
    fn benchmark_operations(
        &self,
        ids: &[BenchmarkId],
    ) -> Result<BTreeMap<BenchmarkId, String>, StoreError> {
        Ok(self
            .query_ids(
                "SELECT id, operation FROM benchmark WHERE id IN ({ids})",
                ids,
                |row| Ok((row.get::<_, BenchmarkId>(0)?, row.get::<_, String>(1)?)),
            )?
            .into_iter()
            .collect())
    }

    fn total_cycles_by_iteration(&self, ids: &[BenchmarkId]) -> Result<Vec<CycleRow>, StoreError> {
        self.query_ids(
            "SELECT cycles.benchmark_iteration_id, cycles.cycles FROM cycles \
             JOIN benchmark_iteration ON benchmark_iteration.id = cycles.benchmark_iteration_id \
             WHERE benchmark_iteration.benchmark_id IN ({ids})",
            ids,
            |row| {
                Ok(CycleRow {
                    iteration_id: row.get(0)?,
                    cycles: unsigned(row, 1, "cycles")?,
                })
            },
        )
    }

    fn function_instruction_counters(
        &self,
        ids: &[BenchmarkId],
    ) -> Result<Vec<CounterRow>, StoreError> {
        self.query_ids(
            "SELECT func_instrs.benchmark_iteration_id, func_name, instr_name, instr_count, \
             stall_count FROM func_instrs \
             JOIN benchmark_iteration ON benchmark_iteration.id = func_instrs.benchmark_iteration_id \
             WHERE benchmark_iteration.benchmark_id IN ({ids})",
            ids,
            |row| {
                Ok(CounterRow {
                    iteration_id: row.get(0)?,
                    func_name: row.get(1)?,
                    instr_name: row.get(2)?,
                    instr_count: unsigned(row, 3, "instr_count")?,
                    stall_count: unsigned(row, 4, "stall_count")?,
                })
            },
        )
    }

    fn call_counts(&self, ids: &[BenchmarkId]) -> Result<Vec<CallRow>, StoreError> {
        self.query_ids(
            "SELECT func_calls.benchmark_iteration_id, callee_func_name, call_count FROM func_calls \
             JOIN benchmark_iteration ON benchmark_iteration.id = func_calls.benchmark_iteration_id \
             WHERE benchmark_iteration.benchmark_id IN ({ids})",
            ids,
            |row| {
                Ok(CallRow {
                    iteration_id: row.get(0)?,
                    callee_func_name: row.get(1)?,
                    call_count: unsigned(row, 2, "call_count")?,
                })
            },
        )
    }
}

/// `?,?,?` for an `IN` list
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Read a counter column, rejecting negative values
fn unsigned(row: &Row<'_>, idx: usize, column: &str) -> Result<u64, StoreError> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value)
        .map_err(|_| StoreError::Malformed(format!("negative {}: {}", column, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner_db() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE benchmark (id INTEGER PRIMARY KEY, operation TEXT);
             CREATE TABLE benchmark_iteration (id INTEGER PRIMARY KEY, benchmark_id INTEGER);
             CREATE TABLE cycles (benchmark_iteration_id INTEGER, cycles INTEGER);
             CREATE TABLE func_instrs (benchmark_iteration_id INTEGER, func_name TEXT,
                                       instr_name TEXT, instr_count INTEGER, stall_count INTEGER);
             CREATE TABLE func_calls (benchmark_iteration_id INTEGER, callee_func_name TEXT,
                                      call_count INTEGER);
             INSERT INTO benchmark VALUES (1, 'sign'), (2, 'verify');
             INSERT INTO benchmark_iteration VALUES (10, 1), (20, 2);
             INSERT INTO cycles VALUES (10, 100), (20, 200);
             INSERT INTO func_instrs VALUES (10, 'main', 'add', 100, 3), (20, 'main', 'add', 200, 0);
             INSERT INTO func_calls VALUES (10, 'ntt_dilithium', 4), (20, 'ntt_dilithium', 8);",
        )
        .unwrap();
        SqliteStore::from_connection(conn)
    }

    #[test]
    fn test_queries_are_scoped_to_selection() {
        let store = runner_db();

        let cycles = store.total_cycles_by_iteration(&[1]).unwrap();
        assert_eq!(
            cycles,
            vec![CycleRow {
                iteration_id: 10,
                cycles: 100
            }]
        );

        let counters = store.function_instruction_counters(&[2]).unwrap();
        assert_eq!(counters.len(), 1);
        assert_eq!(counters[0].instr_count, 200);

        let calls = store.call_counts(&[1, 2]).unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_benchmark_operations_skip_unknown_ids() {
        let store = runner_db();
        let known = store.benchmark_operations(&[1, 2, 3]).unwrap();

        assert_eq!(known.len(), 2);
        assert_eq!(known[&2], "verify");
    }

    #[test]
    fn test_negative_counter_is_malformed() {
        let store = runner_db();
        store
            .conn()
            .execute("INSERT INTO func_calls VALUES (10, 'poly_uniform', -1)", [])
            .unwrap();

        assert!(matches!(
            store.call_counts(&[1]),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_open_rejects_non_database() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "{\"benchmarks\": []}").unwrap();

        assert!(SqliteStore::open(temp_file.path()).is_err());
    }
}
