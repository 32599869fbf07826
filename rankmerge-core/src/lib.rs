/// rankmerge-core: merge new items into a ranked list using pairwise judgments.
///
/// Every ordering question goes to an [`OrderingOracle`]. The crate never
/// compares items itself, so the same code runs against a person at a
/// terminal, a scripted test double, or a simulated judge.
///
/// # Quick start
///
/// ```rust
/// use std::collections::VecDeque;
/// use rankmerge_core::{merge_pending, ConstantOracle, Decision, Item};
///
/// let ranked = vec![Item::new("b.txt"), Item::new("c.txt")];
/// let mut pending: VecDeque<Item> = vec![Item::new("a.txt")].into();
///
/// let report = merge_pending(&mut pending, ranked, &mut ConstantOracle(Decision::After)).unwrap();
///
/// assert_eq!(report.ranked.last().unwrap().as_str(), "a.txt");
/// assert!(pending.is_empty());
/// ```

pub mod bench;
pub mod constants;
pub mod error;
pub mod insert;
pub mod oracle;
pub mod session;
pub mod store;
pub mod types;
pub mod vocabulary;

// Re-export primary public API at crate root.
pub use bench::{run_bench, run_trial, BenchOptions, BenchSummary, TrialResult};
pub use error::{MergeError, OracleError, StoreError};
pub use insert::{comparison_bound, insert, merge_pending, total_comparison_bound};
pub use oracle::{ConstantOracle, CountingOracle, OrderingOracle, ScriptedOracle, SimulatedOracle};
pub use session::MergeSession;
pub use store::{FileStore, MemoryStore, Store};
pub use types::{Decision, Item, MergeReport};
pub use vocabulary::{Answer, AnswerVocabulary, UnrecognizedPolicy};
