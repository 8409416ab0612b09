//! Reducers that fold a per-iteration sequence into one figure.

use crate::utils::error::StatsError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Statistic applied across iterations
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Reducer {
    Mean,
    #[default]
    Median,
    StdDev,
    Min,
    Max,
}

impl Reducer {
    /// Reduce a sequence to a single value
    ///
    /// # Errors
    /// * `StatsError::EmptyInput` - no values
    /// * `StatsError::TooFewSamples` - standard deviation over a single value
    pub fn apply(&self, values: &[f64]) -> Result<f64, StatsError> {
        match self {
            Reducer::Mean => mean(values),
            Reducer::Median => median(values),
            Reducer::StdDev => std_dev(values),
            Reducer::Min => extreme(values, Ordering::Less),
            Reducer::Max => extreme(values, Ordering::Greater),
        }
    }

    /// Same as `apply`, rounded half-to-even to a non-negative integer
    pub fn apply_rounded(&self, values: &[f64]) -> Result<u64, StatsError> {
        self.apply(values).map(to_count)
    }

    /// A reducer that describes a typical value rather than a spread.
    ///
    /// Call counts are summarized with this, since a spread of calls is no
    /// divisor for a per-call cost.
    pub fn central(&self) -> Reducer {
        match self {
            Reducer::StdDev => Reducer::Median,
            other => *other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reducer::Mean => "Mean",
            Reducer::Median => "Median",
            Reducer::StdDev => "Std. Dev.",
            Reducer::Min => "Min",
            Reducer::Max => "Max",
        }
    }
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator)
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::TooFewSamples {
            needed: 2,
            got: values.len(),
        });
    }

    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Ok(variance.sqrt())
}

fn extreme(values: &[f64], keep: Ordering) -> Result<f64, StatsError> {
    values
        .iter()
        .copied()
        .reduce(|best, v| {
            if v.partial_cmp(&best) == Some(keep) {
                v
            } else {
                best
            }
        })
        .ok_or(StatsError::EmptyInput)
}

/// Round half-to-even and clamp into a count
pub fn to_count(value: f64) -> u64 {
    value.round_ties_even().max(0.0) as u64
}

/// Widen integer samples for reduction
pub fn as_samples(values: &[u64]) -> Vec<f64> {
    values.iter().map(|&v| v as f64).collect()
}
