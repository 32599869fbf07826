/// Simulated merges for measuring how many questions a run costs.
///
/// Each trial shuffles synthetic items, merges them into an empty list with a
/// `SimulatedOracle`, and compares the result against the hidden order.
use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::OracleError;
use crate::insert::{merge_pending, total_comparison_bound};
use crate::oracle::SimulatedOracle;
use crate::types::Item;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchOptions {
    pub items: usize,
    pub trials: usize,
    /// Probability of each simulated answer being flipped.
    pub noise: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialResult {
    pub comparisons: usize,
    /// Final list equals the hidden order.
    pub exact: bool,
    /// Number of adjacent pairs left out of order.
    pub inversions: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchSummary {
    pub items: usize,
    pub trials: usize,
    pub noise: f64,
    pub mean_comparisons: f64,
    pub max_comparisons: usize,
    /// Worst case for binary insertion: sum of ceil(log2(k + 1)) for k < items.
    pub comparison_bound: usize,
    /// Fraction of trials that reproduced the hidden order exactly.
    pub exact_rate: f64,
    pub mean_adjacent_inversions: f64,
}

fn synthetic_items(n: usize) -> Vec<Item> {
    let width = n.to_string().len();
    (0..n).map(|i| Item::new(format!("item-{i:0width$}"))).collect()
}

/// Run one trial with its own seed.
pub fn run_trial(items: usize, noise: f64, seed: u64) -> Result<TrialResult, OracleError> {
    let truth = synthetic_items(items);
    let mut order = truth.clone();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut oracle = SimulatedOracle::new(&truth, noise, seed.wrapping_add(1));
    let mut pending: VecDeque<Item> = order.into();
    let report = merge_pending(&mut pending, Vec::new(), &mut oracle)?;

    // Synthetic names are zero-padded, so string order is the hidden order.
    let inversions = report
        .ranked
        .windows(2)
        .filter(|w| w[0].as_str() > w[1].as_str())
        .count();

    Ok(TrialResult {
        comparisons: report.comparisons,
        exact: report.ranked == truth,
        inversions,
    })
}

pub fn run_bench(options: &BenchOptions) -> Result<BenchSummary, OracleError> {
    let results = (0..options.trials)
        .map(|t| run_trial(options.items, options.noise, options.seed.wrapping_add(t as u64 * 2)))
        .collect::<Result<Vec<_>, _>>()?;

    let trials = results.len().max(1) as f64;
    Ok(BenchSummary {
        items: options.items,
        trials: options.trials,
        noise: options.noise,
        mean_comparisons: results.iter().map(|r| r.comparisons as f64).sum::<f64>() / trials,
        max_comparisons: results.iter().map(|r| r.comparisons).max().unwrap_or(0),
        comparison_bound: total_comparison_bound(0, options.items),
        exact_rate: results.iter().filter(|r| r.exact).count() as f64 / trials,
        mean_adjacent_inversions: results.iter().map(|r| r.inversions as f64).sum::<f64>() / trials,
    })
}
