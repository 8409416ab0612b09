//! Cross-iteration statistics over total and attributed cycles.

use super::attribution::Attribution;
use super::reducer::{as_samples, mean, to_count, Reducer};
use crate::loader::{CallCounts, CounterPair, LoadedTrace};
use crate::utils::config::SYNTHETIC_CALLEES;
use crate::utils::error::StatsError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reduced (cycles, stalls) pair of one function
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionStat {
    pub cycles: f64,
    pub stalls: f64,
}

impl FunctionStat {
    pub fn total(&self) -> f64 {
        self.cycles + self.stalls
    }

    /// Both components rounded half-to-even
    pub fn rounded(&self) -> CounterPair {
        CounterPair::new(to_count(self.cycles), to_count(self.stalls))
    }
}

/// Reduce the recorded total cycles of every iteration
///
/// **Public** - overall cycle statistic
pub fn cycles_statistic(trace: &LoadedTrace, reducer: Reducer) -> Result<f64, StatsError> {
    reducer.apply(&as_samples(&trace.total_cycles()))
}

/// Reduce each function's per-iteration (cycles, stalls) independently
///
/// **Public** - main entry point for per-function statistics
///
/// # Arguments
/// * `attribution` - Per-iteration attribution
/// * `calls` - Observed call counts, needed only when `per_call` is set
/// * `reducer` - Statistic applied to each of the two sequences
/// * `per_call` - Divide every per-iteration value by the mean call count
///   first. `main` and `SHAKE` are never divided.
///
/// # Errors
/// * `StatsError::MissingCallCounts` / `StatsError::ZeroCalls` - no usable divisor
/// * Any error of the reducer itself
pub fn per_function_statistic(
    attribution: &Attribution,
    calls: &CallCounts,
    reducer: Reducer,
    per_call: bool,
) -> Result<BTreeMap<String, FunctionStat>, StatsError> {
    let mut stats = BTreeMap::new();

    for function in attribution.function_names() {
        let series = attribution.series(function);

        let divisor = if per_call && !SYNTHETIC_CALLEES.contains(&function.as_str()) {
            mean_calls(calls, function)?
        } else {
            1.0
        };

        let cycles: Vec<f64> = series.iter().map(|p| p.count as f64 / divisor).collect();
        let stalls: Vec<f64> = series.iter().map(|p| p.stalls as f64 / divisor).collect();

        let stat = FunctionStat {
            cycles: reducer.apply(&cycles)?,
            stalls: reducer.apply(&stalls)?,
        };
        stats.insert(function.clone(), stat);
    }

    debug!(
        "Reduced {} functions with {:?} (per call: {})",
        stats.len(),
        reducer,
        per_call
    );

    Ok(stats)
}

/// Mean observed call count, the per-call divisor
///
/// **Public** - shared by the per-call statistic and report assembly
pub fn mean_calls(calls: &CallCounts, function: &str) -> Result<f64, StatsError> {
    let counts = calls
        .get(function)
        .ok_or_else(|| StatsError::MissingCallCounts(function.to_string()))?;

    let divisor = mean(&as_samples(counts))
        .map_err(|_| StatsError::MissingCallCounts(function.to_string()))?;

    if divisor == 0.0 {
        return Err(StatsError::ZeroCalls(function.to_string()));
    }

    Ok(divisor)
}

/// Call count reported next to a function, reduced with the central form of `reducer`
pub fn representative_calls(
    calls: &CallCounts,
    function: &str,
    reducer: Reducer,
) -> Result<u64, StatsError> {
    let counts = calls
        .get(function)
        .filter(|counts| !counts.is_empty())
        .ok_or_else(|| StatsError::MissingCallCounts(function.to_string()))?;

    let representative = reducer.central().apply_rounded(&as_samples(counts))?;
    if representative == 0 {
        return Err(StatsError::ZeroCalls(function.to_string()));
    }

    Ok(representative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::attribution::{attribute, CycleAccounting};
    use crate::loader::{BenchmarkSelection, IterationTrace};

    fn trace(rows: &[(&str, u64, u64)], iterations: usize, calls: &[(&str, &[u64])]) -> LoadedTrace {
        // rows: (function, cycles in iteration i = base * (i + 1), stalls)
        let mut map = BTreeMap::new();
        for i in 0..iterations {
            let mut it = IterationTrace::default();
            for (func, base, stalls) in rows {
                let count = base * (i as u64 + 1);
                it.functions
                    .entry(func.to_string())
                    .or_default()
                    .insert("add".to_string(), CounterPair::new(count, *stalls));
                it.total_cycles += count;
            }
            map.insert(i as i64, it);
        }

        let mut call_counts = CallCounts::new();
        for (func, counts) in calls {
            call_counts.set(func, counts.to_vec());
        }

        LoadedTrace {
            selection: BenchmarkSelection::single(1),
            operation: "sign".to_string(),
            iterations: map,
            call_counts,
        }
    }

    #[test]
    fn test_cycles_statistic() {
        let t = trace(&[("main", 100, 0)], 3, &[]);
        assert_eq!(cycles_statistic(&t, Reducer::Mean).unwrap(), 200.0);
        assert_eq!(cycles_statistic(&t, Reducer::Median).unwrap(), 200.0);
        assert_eq!(cycles_statistic(&t, Reducer::StdDev).unwrap(), 100.0);
    }

    #[test]
    fn test_per_function_without_normalization() {
        let t = trace(&[("main", 10, 1), ("ntt_dilithium", 30, 2)], 3, &[]);
        let attribution = attribute(&t, CycleAccounting::Instructions).unwrap();

        let stats = per_function_statistic(&attribution, &t.call_counts, Reducer::Median, false)
            .unwrap();
        assert_eq!(stats["main"], FunctionStat { cycles: 20.0, stalls: 1.0 });
        assert_eq!(stats["ntt_dilithium"], FunctionStat { cycles: 60.0, stalls: 2.0 });
    }

    #[test]
    fn test_per_call_skips_synthetic_functions() {
        let t = trace(&[("main", 10, 0)], 2, &[("main", &[1])]);
        let attribution = attribute(&t, CycleAccounting::Instructions).unwrap();

        let stats =
            per_function_statistic(&attribution, &t.call_counts, Reducer::Mean, true).unwrap();
        assert_eq!(stats["main"].cycles, 15.0);
    }

    #[test]
    fn test_zero_calls_is_error() {
        let t = trace(&[("poly_uniform", 10, 0)], 2, &[("poly_uniform", &[0, 0])]);
        let attribution = attribute(&t, CycleAccounting::Instructions).unwrap();

        let err = per_function_statistic(&attribution, &t.call_counts, Reducer::Mean, true)
            .unwrap_err();
        assert_eq!(err, StatsError::ZeroCalls("poly_uniform".to_string()));
    }

    #[test]
    fn test_missing_calls_is_error() {
        let t = trace(&[("poly_uniform", 10, 0)], 2, &[]);
        let attribution = attribute(&t, CycleAccounting::Instructions).unwrap();

        let err = per_function_statistic(&attribution, &t.call_counts, Reducer::Mean, true)
            .unwrap_err();
        assert_eq!(err, StatsError::MissingCallCounts("poly_uniform".to_string()));
    }

    #[test]
    fn test_representative_calls() {
        let mut calls = CallCounts::new();
        calls.set("ntt_dilithium", vec![4, 4, 6]);
        assert_eq!(representative_calls(&calls, "ntt_dilithium", Reducer::Median).unwrap(), 4);
        assert_eq!(representative_calls(&calls, "ntt_dilithium", Reducer::StdDev).unwrap(), 4);
        assert!(representative_calls(&calls, "intt_dilithium", Reducer::Median).is_err());
    }
}
