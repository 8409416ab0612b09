//! Roll per-function totals up into functional groups.

use super::reducer::to_count;
use crate::classification::Classification;
use crate::loader::CounterPair;
use crate::utils::error::{GroupingError, StatsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed (cycles, stalls) of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub group: String,
    pub color: Option<String>,
    pub cycles: u64,
    pub stalls: u64,
}

impl GroupTotal {
    pub fn total(&self) -> u64 {
        self.cycles + self.stalls
    }
}

/// Share of one group in the grand total, in whole percent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupShare {
    pub group: String,
    pub color: Option<String>,
    pub percentage: u64,
}

/// Every group's total, largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRollup {
    pub groups: Vec<GroupTotal>,
    pub grand_total: u64,
}

impl GroupRollup {
    /// Percentage breakdown of the rollup.
    ///
    /// Groups rounding to 0% are left out but still count towards the
    /// denominator.
    ///
    /// # Errors
    /// * `StatsError::ZeroTotal` - nothing to divide by
    pub fn shares(&self) -> Result<Vec<GroupShare>, StatsError> {
        if self.grand_total == 0 {
            return Err(StatsError::ZeroTotal);
        }

        Ok(self
            .groups
            .iter()
            .map(|g| GroupShare {
                group: g.group.clone(),
                color: g.color.clone(),
                percentage: to_count(g.total() as f64 / self.grand_total as f64 * 100.0),
            })
            .filter(|share| share.percentage != 0)
            .collect())
    }
}

/// Fold per-function (cycles, stalls) into their groups
///
/// **Public** - main entry point for grouping
///
/// # Errors
/// * `GroupingError::Unmapped` - a function has no group
pub fn roll_up(
    per_function: &BTreeMap<String, CounterPair>,
    classification: &Classification,
) -> Result<GroupRollup, GroupingError> {
    let mut sums: BTreeMap<&str, CounterPair> = BTreeMap::new();

    for (function, pair) in per_function {
        let group = classification.group_of(function)?;
        *sums.entry(group).or_default() += *pair;
    }

    let mut groups: Vec<GroupTotal> = sums
        .into_iter()
        .map(|(group, pair)| GroupTotal {
            group: group.to_string(),
            color: classification.color_of(group).map(str::to_string),
            cycles: pair.count,
            stalls: pair.stalls,
        })
        .collect();

    // Stable sort keeps the name order for ties
    groups.sort_by(|a, b| b.total().cmp(&a.total()));

    let grand_total = groups.iter().map(GroupTotal::total).sum();

    Ok(GroupRollup {
        groups,
        grand_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification() -> Classification {
        Classification::from_toml_str(
            r#"
[groups.Arithmetic]
color = "set37c1"
functions = ["ntt", "intt"]

[groups.Sampling]
functions = ["poly_uniform"]

[groups.Packing]
functions = ["polyz_pack"]

[groups.Other]
functions = ["main"]
"#,
        )
        .unwrap()
    }

    fn per_function(rows: &[(&str, u64, u64)]) -> BTreeMap<String, CounterPair> {
        rows.iter()
            .map(|(f, c, s)| (f.to_string(), CounterPair::new(*c, *s)))
            .collect()
    }

    #[test]
    fn test_roll_up_sums_and_sorts() {
        let funcs = per_function(&[
            ("ntt", 300, 10),
            ("intt", 200, 5),
            ("poly_uniform", 400, 0),
            ("main", 80, 5),
        ]);

        let rollup = roll_up(&funcs, &classification()).unwrap();

        assert_eq!(rollup.groups[0].group, "Arithmetic");
        assert_eq!(rollup.groups[0].cycles, 500);
        assert_eq!(rollup.groups[0].stalls, 15);
        assert_eq!(rollup.groups[0].color.as_deref(), Some("set37c1"));
        assert_eq!(rollup.groups[1].group, "Sampling");
        assert_eq!(rollup.grand_total, 1000);
    }

    #[test]
    fn test_shares_drop_zero_percent_groups() {
        let funcs = per_function(&[("ntt", 996, 0), ("main", 4, 0)]);
        let rollup = roll_up(&funcs, &classification()).unwrap();

        let shares = rollup.shares().unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].group, "Arithmetic");
        assert_eq!(shares[0].percentage, 100);
    }

    #[test]
    fn test_zero_percent_groups_stay_in_denominator() {
        // Sampling, Packing and Other each round to 0% but hold 129 of 10054
        let funcs = per_function(&[
            ("ntt", 9925, 0),
            ("poly_uniform", 40, 0),
            ("polyz_pack", 40, 0),
            ("main", 49, 0),
        ]);
        let rollup = roll_up(&funcs, &classification()).unwrap();

        let shares = rollup.shares().unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].group, "Arithmetic");
        assert_eq!(shares[0].percentage, 99);
    }

    #[test]
    fn test_unmapped_function_fails() {
        let funcs = per_function(&[("poly_challenge", 1, 0)]);
        assert!(matches!(
            roll_up(&funcs, &classification()),
            Err(GroupingError::Unmapped(_))
        ));
    }

    #[test]
    fn test_zero_total() {
        let funcs = per_function(&[("main", 0, 0)]);
        let rollup = roll_up(&funcs, &classification()).unwrap();
        assert_eq!(rollup.shares(), Err(StatsError::ZeroTotal));
    }
}
