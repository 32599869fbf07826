/// Binary insertion driven by an external judge.
///
/// Each call asks about the midpoint and descends into one half only, so an
/// insertion into a list of length n costs at most ceil(log2(n + 1))
/// questions.
use std::collections::VecDeque;

use tracing::{debug, info};

use crate::error::OracleError;
use crate::oracle::{CountingOracle, OrderingOracle};
use crate::types::{Decision, Item, MergeReport};

/// Insert `new_item` into `ranked` at the position the oracle points to.
///
/// `ranked` must already be ordered consistently with the oracle's answers.
/// Returns a new list holding every original item plus `new_item` exactly once.
pub fn insert<O: OrderingOracle + ?Sized>(
    ranked: &[Item],
    new_item: Item,
    oracle: &mut O,
) -> Result<Vec<Item>, OracleError> {
    match ranked.len() {
        0 => Ok(vec![new_item]),
        1 => {
            let existing = &ranked[0];
            let decision = oracle.compare(existing, &new_item)?;
            debug!(existing = %existing, new = %new_item, ?decision, "compared");
            Ok(match decision {
                Decision::After => vec![existing.clone(), new_item],
                Decision::Before => vec![new_item, existing.clone()],
            })
        }
        len => {
            let m = len / 2;
            let mid = &ranked[m];
            let decision = oracle.compare(mid, &new_item)?;
            debug!(mid = %mid, new = %new_item, index = m, ?decision, "compared");
            match decision {
                Decision::After => {
                    let mut merged = Vec::with_capacity(len + 1);
                    merged.extend_from_slice(&ranked[..=m]);
                    merged.extend(insert(&ranked[m + 1..], new_item, oracle)?);
                    Ok(merged)
                }
                Decision::Before => {
                    let mut merged = insert(&ranked[..m], new_item, oracle)?;
                    merged.extend_from_slice(&ranked[m..]);
                    Ok(merged)
                }
            }
        }
    }
}

/// Upper bound on questions asked when inserting into a list of `len` items:
/// ceil(log2(len + 1)).
pub fn comparison_bound(len: usize) -> usize {
    (usize::BITS - len.leading_zeros()) as usize
}

/// Upper bound on questions asked when merging `pending` items one by one into
/// a list that starts with `ranked` items.
pub fn total_comparison_bound(ranked: usize, pending: usize) -> usize {
    (ranked..ranked + pending).map(comparison_bound).sum()
}

/// Drain `pending` front to back, inserting each item into `ranked`.
///
/// On an oracle failure the item being inserted is pushed back onto the front
/// of `pending` and the error is returned; items already merged in this call
/// are lost with the in-memory list.
pub fn merge_pending<O: OrderingOracle + ?Sized>(
    pending: &mut VecDeque<Item>,
    mut ranked: Vec<Item>,
    oracle: &mut O,
) -> Result<MergeReport, OracleError> {
    let mut counting = CountingOracle::new(oracle);
    let mut inserted = 0;

    while let Some(new_item) = pending.pop_front() {
        let before = counting.count();
        match insert(&ranked, new_item.clone(), &mut counting) {
            Ok(merged) => {
                ranked = merged;
                inserted += 1;
                info!(
                    item = %new_item,
                    comparisons = counting.count() - before,
                    remaining = pending.len(),
                    "inserted"
                );
            }
            Err(e) => {
                pending.push_front(new_item);
                return Err(e);
            }
        }
    }

    Ok(MergeReport {
        ranked,
        inserted,
        comparisons: counting.count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{ConstantOracle, ScriptedOracle, SimulatedOracle};
    use proptest::prelude::*;

    fn items(names: &[&str]) -> Vec<Item> {
        names.iter().map(|n| Item::new(*n)).collect()
    }

    #[test]
    fn test_insert_into_empty_asks_nothing() {
        let mut oracle = ScriptedOracle::default();
        let out = insert(&[], Item::new("x"), &mut oracle).unwrap();
        assert_eq!(out, items(&["x"]));
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_insert_single_element() {
        let ranked = items(&["e"]);

        let mut after = ScriptedOracle::new([Decision::After]);
        assert_eq!(insert(&ranked, Item::new("n"), &mut after).unwrap(), items(&["e", "n"]));
        assert_eq!(after.asked, vec![(Item::new("e"), Item::new("n"))]);

        let mut before = ScriptedOracle::new([Decision::Before]);
        assert_eq!(insert(&ranked, Item::new("n"), &mut before).unwrap(), items(&["n", "e"]));
    }

    #[test]
    fn test_insert_always_after_appends() {
        let ranked = items(&["b.txt", "c.txt"]);
        let out = insert(&ranked, Item::new("a.txt"), &mut ConstantOracle(Decision::After)).unwrap();
        assert_eq!(out, items(&["b.txt", "c.txt", "a.txt"]));
    }

    #[test]
    fn test_insert_always_before_prepends() {
        let ranked = items(&["b.txt", "c.txt"]);
        let out = insert(&ranked, Item::new("a.txt"), &mut ConstantOracle(Decision::Before)).unwrap();
        assert_eq!(out, items(&["a.txt", "b.txt", "c.txt"]));
    }

    #[test]
    fn test_insert_asks_midpoint_first() {
        let ranked = items(&["a", "b", "c", "d", "e"]);
        // mid = "c" -> After, then [d, e] mid = "e" -> Before, then [d] -> After
        let mut oracle = ScriptedOracle::new([Decision::After, Decision::Before, Decision::After]);
        let out = insert(&ranked, Item::new("n"), &mut oracle).unwrap();

        assert_eq!(out, items(&["a", "b", "c", "d", "n", "e"]));
        let mids: Vec<&str> = oracle.asked.iter().map(|(e, _)| e.as_str()).collect();
        assert_eq!(mids, vec!["c", "e", "d"]);
    }

    #[test]
    fn test_insert_propagates_oracle_error() {
        let ranked = items(&["a", "b"]);
        let mut oracle = ScriptedOracle::new([Decision::Before]);
        let err = insert(&ranked, Item::new("n"), &mut oracle).unwrap_err();
        assert!(matches!(err, OracleError::Exhausted { asked: 1 }));
    }

    #[test]
    fn test_comparison_bound() {
        assert_eq!(comparison_bound(0), 0);
        assert_eq!(comparison_bound(1), 1);
        assert_eq!(comparison_bound(2), 2);
        assert_eq!(comparison_bound(3), 2);
        assert_eq!(comparison_bound(4), 3);
        assert_eq!(comparison_bound(7), 3);
        assert_eq!(comparison_bound(8), 4);
        assert_eq!(total_comparison_bound(0, 3), 3);
    }

    #[test]
    fn test_merge_pending_empty_queue_is_noop() {
        let mut pending = VecDeque::new();
        let ranked = items(&["a", "b"]);
        let mut oracle = ScriptedOracle::default();

        let report = merge_pending(&mut pending, ranked.clone(), &mut oracle).unwrap();
        assert!(report.is_noop());
        assert_eq!(report.ranked, ranked);
        assert_eq!(report.comparisons, 0);
        assert_eq!(oracle.calls(), 0);
    }

    #[test]
    fn test_merge_pending_into_empty_list() {
        let mut pending: VecDeque<Item> = items(&["x.txt", "y.txt"]).into();
        let mut oracle = ScriptedOracle::new([Decision::Before]);

        let report = merge_pending(&mut pending, Vec::new(), &mut oracle).unwrap();
        assert!(pending.is_empty());
        assert_eq!(oracle.calls(), 1);
        assert_eq!(oracle.asked[0], (Item::new("x.txt"), Item::new("y.txt")));
        assert_eq!(report.ranked, items(&["y.txt", "x.txt"]));
        assert_eq!(report.inserted, 2);
        assert_eq!(report.comparisons, 1);
    }

    #[test]
    fn test_merge_pending_restores_item_on_failure() {
        let mut pending: VecDeque<Item> = items(&["x", "y", "z"]).into();
        let mut oracle = ScriptedOracle::new([Decision::After]);

        let err = merge_pending(&mut pending, Vec::new(), &mut oracle).unwrap_err();
        assert!(matches!(err, OracleError::Exhausted { .. }));
        assert_eq!(pending, VecDeque::from(items(&["z"])));
    }

    #[test]
    fn test_merge_pending_recovers_hidden_order() {
        let truth: Vec<Item> = (0..40).map(|i| Item::new(format!("item-{i:02}"))).collect();
        let mut shuffled = truth.clone();
        shuffled.reverse();
        shuffled.swap(3, 17);

        let mut oracle = SimulatedOracle::new(&truth, 0.0, 42);
        let mut pending: VecDeque<Item> = shuffled.into();
        let report = merge_pending(&mut pending, Vec::new(), &mut oracle).unwrap();

        assert_eq!(report.ranked, truth);
        assert!(report.comparisons <= total_comparison_bound(0, 40));
    }

    fn distinct_items(max: usize) -> impl Strategy<Value = Vec<Item>> {
        proptest::collection::btree_set("[a-z]{1,6}", 0..max)
            .prop_map(|set| set.into_iter().map(Item::new).collect())
    }

    proptest! {
        #[test]
        fn prop_insert_keeps_every_item_once(
            ranked in distinct_items(64),
            answers in proptest::collection::vec(any::<bool>(), 8),
        ) {
            let new_item = Item::new("NEW");
            let mut oracle = ScriptedOracle::new(answers.into_iter().map(Decision::from));
            let out = insert(&ranked, new_item.clone(), &mut oracle).unwrap();

            prop_assert_eq!(out.len(), ranked.len() + 1);
            prop_assert_eq!(out.iter().filter(|i| **i == new_item).count(), 1);
            let rest: Vec<Item> = out.into_iter().filter(|i| *i != new_item).collect();
            prop_assert_eq!(rest, ranked);
        }

        #[test]
        fn prop_insert_comparisons_are_logarithmic(
            ranked in distinct_items(200),
            answers in proptest::collection::vec(any::<bool>(), 10),
        ) {
            let mut oracle = ScriptedOracle::new(answers.into_iter().map(Decision::from));
            insert(&ranked, Item::new("NEW"), &mut oracle).unwrap();
            prop_assert!(oracle.calls() <= comparison_bound(ranked.len()));
        }

        #[test]
        fn prop_consistent_oracle_keeps_list_sorted(
            ranked in distinct_items(64),
            new_name in "[a-z]{7}",
        ) {
            // Seven letters never collide with the one-to-six letter list items.
            let new_item = Item::new(new_name);
            let mut truth = ranked.clone();
            truth.push(new_item.clone());
            truth.sort_by(|a, b| a.as_str().cmp(b.as_str()));

            let mut oracle = SimulatedOracle::new(&truth, 0.0, 0);
            let out = insert(&ranked, new_item, &mut oracle).unwrap();
            prop_assert_eq!(out, truth);
        }
    }
}
