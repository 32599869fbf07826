/// Pairwise ordering oracles.
///
/// The merge never compares items itself. Every ordering question goes to an
/// `OrderingOracle`: a human at a terminal in the CLI, or one of the scripted
/// and simulated judges defined here.
use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::OracleError;
use crate::types::{Decision, Item};

/// A judge that decides where a new item goes relative to an existing one.
///
/// `compare` may block indefinitely (a human thinking). There is no timeout
/// and no default answer.
pub trait OrderingOracle {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError>;
}

impl<O: OrderingOracle + ?Sized> OrderingOracle for &mut O {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError> {
        (**self).compare(existing, new)
    }
}

impl<O: OrderingOracle + ?Sized> OrderingOracle for Box<O> {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError> {
        (**self).compare(existing, new)
    }
}

/// Always returns the same decision.
#[derive(Debug, Clone, Copy)]
pub struct ConstantOracle(pub Decision);

impl OrderingOracle for ConstantOracle {
    fn compare(&mut self, _existing: &Item, _new: &Item) -> Result<Decision, OracleError> {
        Ok(self.0)
    }
}

/// Replays a fixed sequence of decisions and records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    script: VecDeque<Decision>,
    /// `(existing, new)` for each call, in order.
    pub asked: Vec<(Item, Item)>,
}

impl ScriptedOracle {
    pub fn new(script: impl IntoIterator<Item = Decision>) -> Self {
        ScriptedOracle {
            script: script.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.asked.len()
    }
}

impl OrderingOracle for ScriptedOracle {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError> {
        let decision = self.script.pop_front().ok_or(OracleError::Exhausted {
            asked: self.asked.len(),
        })?;
        self.asked.push((existing.clone(), new.clone()));
        Ok(decision)
    }
}

/// Wraps another oracle and counts the comparisons routed through it.
pub struct CountingOracle<O> {
    inner: O,
    count: usize,
}

impl<O: OrderingOracle> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        CountingOracle { inner, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<O: OrderingOracle> OrderingOracle for CountingOracle<O> {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError> {
        let decision = self.inner.compare(existing, new)?;
        self.count += 1;
        Ok(decision)
    }
}

/// Answers from a hidden ground-truth order, optionally flipping answers at
/// random to model an inconsistent judge.
///
/// An item with a higher hidden rank belongs after one with a lower rank.
pub struct SimulatedOracle {
    ranks: HashMap<Item, usize>,
    noise: f64,
    rng: StdRng,
}

impl SimulatedOracle {
    /// `truth` lists items in their correct final order.
    /// `noise` is the probability of flipping each answer, clamped to [0, 1].
    pub fn new(truth: &[Item], noise: f64, seed: u64) -> Self {
        let ranks = truth
            .iter()
            .enumerate()
            .map(|(rank, item)| (item.clone(), rank))
            .collect();
        SimulatedOracle {
            ranks,
            noise: noise.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn rank_of(&self, item: &Item) -> Result<usize, OracleError> {
        self.ranks
            .get(item)
            .copied()
            .ok_or_else(|| OracleError::UnknownItem(item.to_string()))
    }
}

impl OrderingOracle for SimulatedOracle {
    fn compare(&mut self, existing: &Item, new: &Item) -> Result<Decision, OracleError> {
        let truthful = Decision::from(self.rank_of(new)? > self.rank_of(existing)?);
        if self.noise > 0.0 && self.rng.random_bool(self.noise) {
            Ok(truthful.flipped())
        } else {
            Ok(truthful)
        }
    }
}
