//! Aggregate statistics over a round's votes.
//!
//! Only numeric cards count towards the figures; "?" cards are tallied
//! separately and still appear in the raw vote list.

use serde::{Deserialize, Serialize};

use super::vote::Vote;

/// Figures over the numeric votes of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// How many votes landed on one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    pub value: f64,
    pub count: usize,
    /// Share of the numeric votes, 0-100.
    pub percentage: f64,
}

/// Everything the results view shows about a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    pub total_votes: usize,
    pub unsure_count: usize,
    /// `None` when nobody played a numeric card.
    pub stats: Option<NumericStats>,
    /// Ascending by value.
    pub distribution: Vec<DistributionBucket>,
}

/// Numeric vote values, sorted ascending.
pub fn numeric_values(votes: &[Vote]) -> Vec<f64> {
    let mut values: Vec<f64> = votes.iter().filter_map(|v| v.value.points()).collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Median of an ascending slice.
///
/// Even lengths average the two central values.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn numeric_stats(sorted: &[f64]) -> Option<NumericStats> {
    let median = median(sorted)?;
    let sum: f64 = sorted.iter().sum();
    Some(NumericStats {
        count: sorted.len(),
        average: sum / sorted.len() as f64,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        median,
    })
}

fn distribution(sorted: &[f64]) -> Vec<DistributionBucket> {
    let total = sorted.len() as f64;
    let mut buckets: Vec<DistributionBucket> = Vec::new();
    for &value in sorted {
        match buckets.last_mut() {
            Some(last) if last.value == value => last.count += 1,
            _ => buckets.push(DistributionBucket {
                value,
                count: 1,
                percentage: 0.0,
            }),
        }
    }
    for bucket in &mut buckets {
        bucket.percentage = bucket.count as f64 / total * 100.0;
    }
    buckets
}

/// Summarize a round.
pub fn summarize(votes: &[Vote]) -> VoteSummary {
    let sorted = numeric_values(votes);
    VoteSummary {
        total_votes: votes.len(),
        unsure_count: votes.len() - sorted.len(),
        stats: numeric_stats(&sorted),
        distribution: distribution(&sorted),
    }
}
