//! Instruction-type histogram.
//!
//! Counts every instruction across all functions of an iteration, then takes
//! the median over iterations. Status-register reads are counted like any
//! other instruction here; the SHAKE reassignment only concerns attribution.

use super::reducer::{median, to_count};
use crate::loader::LoadedTrace;
use crate::utils::error::StatsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Median count of one instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionCount {
    pub instruction: String,
    pub count: u64,
}

/// Build the instruction histogram, most frequent first.
///
/// Only iterations that executed an instruction contribute to its median.
/// Equal counts are ordered by instruction name.
pub fn instruction_histogram(trace: &LoadedTrace) -> Result<Vec<InstructionCount>, StatsError> {
    let mut per_instruction: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for iteration in trace.iterations.values() {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for instructions in iteration.functions.values() {
            for (name, pair) in instructions {
                *counts.entry(name.as_str()).or_default() += pair.count;
            }
        }
        for (name, count) in counts {
            per_instruction.entry(name).or_default().push(count as f64);
        }
    }

    let mut histogram = per_instruction
        .into_iter()
        .map(|(name, counts)| {
            Ok(InstructionCount {
                instruction: name.to_string(),
                count: to_count(median(&counts)?),
            })
        })
        .collect::<Result<Vec<_>, StatsError>>()?;

    // Stable sort keeps the name order for ties
    histogram.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BenchmarkSelection, CallCounts, CounterPair, IterationTrace};

    fn trace_with(counts: &[&[(&str, &str, u64)]]) -> LoadedTrace {
        let iterations = counts
            .iter()
            .enumerate()
            .map(|(i, rows)| {
                let mut it = IterationTrace::default();
                for (func, instr, count) in rows.iter() {
                    it.functions
                        .entry(func.to_string())
                        .or_default()
                        .insert(instr.to_string(), CounterPair::new(*count, 0));
                    it.total_cycles += count;
                }
                (i as i64, it)
            })
            .collect();

        LoadedTrace {
            selection: BenchmarkSelection::single(1),
            operation: "verify".to_string(),
            iterations,
            call_counts: CallCounts::new(),
        }
    }

    #[test]
    fn test_median_across_iterations() {
        let trace = trace_with(&[
            &[("main", "add", 5)],
            &[("main", "add", 7)],
            &[("main", "add", 9)],
        ]);

        let histogram = instruction_histogram(&trace).unwrap();
        assert_eq!(
            histogram,
            vec![InstructionCount {
                instruction: "add".to_string(),
                count: 7
            }]
        );
    }

    #[test]
    fn test_sums_across_functions_and_sorts() {
        let trace = trace_with(&[&[
            ("main", "add", 3),
            ("ntt_dilithium", "add", 4),
            ("ntt_dilithium", "bn.mulqacc", 20),
            ("main", "lw", 7),
            ("main", "bn.wsrr", 2),
        ]]);

        let histogram = instruction_histogram(&trace).unwrap();
        let names: Vec<_> = histogram.iter().map(|h| h.instruction.as_str()).collect();

        // add and lw tie at 7, name order breaks it
        assert_eq!(names, vec!["bn.mulqacc", "add", "lw", "bn.wsrr"]);
        assert_eq!(histogram[1].count, 7);
    }
}
