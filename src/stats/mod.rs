//! Rank-sum statistics for two latency samples
//!
//! This module contains the Mann-Whitney U test used to decide whether the
//! latencies of side X and side Y come from the same distribution:
//! - combined ranking of both samples (`rank_all`, `rank_all_averaged`)
//! - the U statistic and its normal approximation (`mann_whitney_u`)
//! - the checked, fully reported variant used by the application
//!   (`MannWhitneyTest`)
//! - descriptive per-side summaries (`LatencySummary`)
//!
//! The test is order-insensitive: only the values matter, not the trial in
//! which they were measured.

use crate::{
    error::{AppError, Result},
    models::{sample::as_millis_f64, LatencySample},
    types::{Side, TieMode},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

/// One value of the merged working set used while ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedObservation<T> {
    /// Measured value
    pub value: T,
    /// Sample the value came from
    pub origin: Side,
    /// Position in the merged sequence: `0..n1` for X, `n1..n1+n2` for Y
    pub position: usize,
}

/// Merge both samples into tagged observations, X first, sorted ascending.
///
/// The sort is stable, so equal values keep merge order.
fn sorted_observations<T: Ord + Copy>(xs: &[T], ys: &[T]) -> Vec<RankedObservation<T>> {
    let mut observations: Vec<RankedObservation<T>> = xs
        .iter()
        .map(|&value| (value, Side::X))
        .chain(ys.iter().map(|&value| (value, Side::Y)))
        .enumerate()
        .map(|(position, (value, origin))| RankedObservation { value, origin, position })
        .collect();

    observations.sort_by(|a, b| a.value.cmp(&b.value));
    observations
}

/// Rank every value of both samples against the combined, sorted set.
///
/// Returns one rank per merged position (X values first, then Y). Ranks are
/// 1-based and form a permutation of `1..=n1+n2`: equal values do not share
/// a rank, the earlier one in merge order gets the lower rank.
pub fn rank_all<T: Ord + Copy>(xs: &[T], ys: &[T]) -> Vec<usize> {
    let observations = sorted_observations(xs, ys);
    let mut ranks = vec![0; observations.len()];

    for (sorted_index, observation) in observations.iter().enumerate() {
        ranks[observation.position] = sorted_index + 1;
    }

    ranks
}

/// Rank both samples, giving tied values the mean of the ranks they span.
pub fn rank_all_averaged<T: Ord + Copy>(xs: &[T], ys: &[T]) -> Vec<f64> {
    let observations = sorted_observations(xs, ys);
    let mut ranks = vec![0.0; observations.len()];

    let mut i = 0;
    while i < observations.len() {
        let mut j = i + 1;
        while j < observations.len() && observations[j].value == observations[i].value {
            j += 1;
        }

        // sorted positions i..j hold ranks i+1..=j
        let average = (i + 1 + j) as f64 / 2.0;
        for observation in &observations[i..j] {
            ranks[observation.position] = average;
        }

        i = j;
    }

    ranks
}

/// Sizes of the groups of equal values in the combined sample
fn tie_group_sizes<T: Ord + Copy>(xs: &[T], ys: &[T]) -> Vec<usize> {
    let observations = sorted_observations(xs, ys);
    let mut sizes = Vec::new();

    let mut i = 0;
    while i < observations.len() {
        let mut j = i + 1;
        while j < observations.len() && observations[j].value == observations[i].value {
            j += 1;
        }
        sizes.push(j - i);
        i = j;
    }

    sizes
}

/// Mann-Whitney U test with ties kept in insertion order.
///
/// Returns `1 + erf(z / sqrt(2))` where `z` is the normal approximation of
/// the smaller U statistic. Pure: empty input yields a non-finite value
/// instead of an error. Use [`MannWhitneyTest`] for checked input.
pub fn mann_whitney_u<T: Ord + Copy>(xs: &[T], ys: &[T]) -> f64 {
    let ranks = rank_all(xs, ys);
    let x_rank_sum: usize = ranks[..xs.len()].iter().sum();

    let n1 = xs.len() as i64;
    let n2 = ys.len() as i64;
    let u1 = x_rank_sum as i64 - n1 * (n1 + 1) / 2;
    let u2 = n1 * n2 - u1;
    let u_min = u1.min(u2);

    let n1n2 = (n1 * n2) as f64;
    let expected_u = n1n2 / 2.0;
    let std_dev_u = (n1n2 * (n1 + n2 + 1) as f64 / 12.0).sqrt();
    let z = (u_min as f64 - expected_u) / std_dev_u;

    significance(z)
}

/// Significance value reported for a z-score: `1 + erf(z / sqrt(2))`.
///
/// `z` is computed from the smaller of U1 and U2, so it is never positive and
/// this equals the two-sided p-value `2 * Phi(-|z|)`.
pub fn significance(z: f64) -> f64 {
    1.0 + erf(z / SQRT_2)
}

/// Error function, FreeBSD msun port (error below 1 ulp)
pub fn erf(x: f64) -> f64 {
    libm::erf(x)
}

/// Full result of a Mann-Whitney U test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// Size of the X sample
    pub n1: usize,
    /// Size of the Y sample
    pub n2: usize,
    /// Sum of the ranks assigned to X
    pub x_rank_sum: f64,
    /// U statistic of X
    pub u1: f64,
    /// U statistic of Y (`n1 * n2 - u1`)
    pub u2: f64,
    /// Smaller of the two U statistics
    pub u_min: f64,
    /// Mean of U under the null hypothesis
    pub expected_u: f64,
    /// Standard deviation of U under the null hypothesis
    pub std_dev_u: f64,
    /// Normal approximation of `u_min`
    pub z_score: f64,
    /// Significance value, `1 + erf(z / sqrt(2))`
    pub p_value: f64,
    /// Tie handling used for ranking
    pub tie_mode: TieMode,
}

impl MannWhitneyResult {
    /// Whether the difference is significant at the given level
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Side whose values tend to be smaller, if any.
    ///
    /// U1 counts the (x, y) pairs where y is smaller, so U1 below its
    /// expectation means X is faster.
    pub fn faster_side(&self) -> Option<Side> {
        if self.u1 < self.expected_u {
            Some(Side::X)
        } else if self.u1 > self.expected_u {
            Some(Side::Y)
        } else {
            None
        }
    }
}

/// Mann-Whitney U test with checked input and a selectable tie mode
#[derive(Debug, Clone, Copy, Default)]
pub struct MannWhitneyTest {
    tie_mode: TieMode,
}

impl MannWhitneyTest {
    pub fn new(tie_mode: TieMode) -> Self {
        Self { tie_mode }
    }

    pub fn tie_mode(&self) -> TieMode {
        self.tie_mode
    }

    /// Run the test over two samples.
    ///
    /// Both samples must be non-empty.
    pub fn run<T: Ord + Copy>(&self, xs: &[T], ys: &[T]) -> Result<MannWhitneyResult> {
        if xs.is_empty() || ys.is_empty() {
            return Err(AppError::statistics(format!(
                "Mann-Whitney U needs two non-empty samples (got {} and {})",
                xs.len(),
                ys.len()
            )));
        }

        let n1 = xs.len();
        let n2 = ys.len();

        let x_rank_sum = match self.tie_mode {
            TieMode::InsertionOrder => rank_all(xs, ys)[..n1].iter().sum::<usize>() as f64,
            TieMode::Average => rank_all_averaged(xs, ys)[..n1].iter().sum::<f64>(),
        };

        let u1 = x_rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;
        let u2 = (n1 * n2) as f64 - u1;
        let u_min = u1.min(u2);

        let n1n2 = (n1 * n2) as f64;
        let n = (n1 + n2) as f64;
        let expected_u = n1n2 / 2.0;

        let variance = match self.tie_mode {
            TieMode::InsertionOrder => n1n2 * (n + 1.0) / 12.0,
            TieMode::Average => {
                let tie_term: f64 = tie_group_sizes(xs, ys)
                    .into_iter()
                    .filter(|&t| t > 1)
                    .map(|t| {
                        let t = t as f64;
                        t * t * t - t
                    })
                    .sum();
                n1n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))
            }
        };
        let std_dev_u = variance.max(0.0).sqrt();

        // every value tied: no rank information at all
        let (z_score, p_value) = if std_dev_u > 0.0 {
            let z = (u_min - expected_u) / std_dev_u;
            (z, significance(z))
        } else {
            (0.0, 1.0)
        };

        Ok(MannWhitneyResult {
            n1,
            n2,
            x_rank_sum,
            u1,
            u2,
            u_min,
            expected_u,
            std_dev_u,
            z_score,
            p_value,
            tie_mode: self.tie_mode,
        })
    }
}

/// Descriptive statistics for one latency sample, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub side: Side,
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub std_dev_ms: f64,
}

impl LatencySummary {
    /// Summarize a sample; `None` for an empty sample
    pub fn from_sample(sample: &LatencySample) -> Option<Self> {
        if sample.is_empty() {
            return None;
        }

        let mut sorted = sample.as_slice().to_vec();
        sorted.sort();

        let values: Vec<f64> = sorted.iter().map(|d| as_millis_f64(*d)).collect();
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;

        let median = if count % 2 == 0 {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        } else {
            values[count / 2]
        };

        let std_dev = if count > 1 {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            side: sample.side,
            count,
            min_ms: values[0],
            max_ms: values[count - 1],
            mean_ms: mean,
            median_ms: median,
            std_dev_ms: std_dev,
        })
    }
}
