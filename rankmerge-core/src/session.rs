/// A full merge run against persisted storage.
///
/// Load both lists, drain pending into ranked, save ranked, then clear
/// pending. Nothing is written unless every insertion succeeded.
use std::collections::VecDeque;

use tracing::info;

use crate::error::MergeError;
use crate::insert::merge_pending;
use crate::oracle::OrderingOracle;
use crate::store::Store;
use crate::types::MergeReport;

pub struct MergeSession<'a> {
    pending: &'a dyn Store,
    ranked: &'a dyn Store,
    dry_run: bool,
}

impl<'a> MergeSession<'a> {
    pub fn new(pending: &'a dyn Store, ranked: &'a dyn Store) -> Self {
        MergeSession {
            pending,
            ranked,
            dry_run: false,
        }
    }

    /// Compute the merge but leave both stores untouched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run<O: OrderingOracle + ?Sized>(&self, oracle: &mut O) -> Result<MergeReport, MergeError> {
        let mut pending: VecDeque<_> = self.pending.load()?.into();
        let ranked = self.ranked.load()?;
        info!(
            pending = pending.len(),
            ranked = ranked.len(),
            from = %self.pending.describe(),
            into = %self.ranked.describe(),
            "starting merge"
        );

        let report = merge_pending(&mut pending, ranked, oracle)?;

        if report.is_noop() {
            info!("nothing pending, ranked list left as is");
            return Ok(report);
        }
        if self.dry_run {
            info!(inserted = report.inserted, "dry run, not saving");
            return Ok(report);
        }

        self.ranked.save(&report.ranked)?;
        self.pending
            .clear()
            .map_err(|source| MergeError::PendingNotCleared { source })?;
        info!(
            inserted = report.inserted,
            comparisons = report.comparisons,
            total = report.ranked.len(),
            "merge saved"
        );
        Ok(report)
    }
}
