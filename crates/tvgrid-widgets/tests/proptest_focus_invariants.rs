//! Property-based invariant tests for focus bookkeeping.
//!
//! 1. The focus tracker follows the focused item through any sequence of
//!    inserts, removes and single-item moves, or reports it lost.
//! 2. Pending moves stay within bounds and settle once per return to zero.
//! 3. Both draw-order policies are permutations.
//! 4. Limited child-state retention never exceeds its bound.
//! 5. Saved selections survive the codec; arbitrary bytes never panic it.

use std::collections::BTreeMap;

use proptest::prelude::*;
use tvgrid_core::ItemChange;
use tvgrid_widgets::{
    ChildStates, CommitOutcome, DrawOrderPolicy, FocusPositionTracker, MAX_PENDING_MOVES,
    PendingMoveCoordinator, SavePolicy, SavedSelection, SelectionStateCodec, VersionedState,
};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Mutation described relative to the current length of the list.
#[derive(Debug, Clone, Copy)]
enum Op {
    Insert { start: usize, count: usize },
    Remove { start: usize, count: usize },
    Move { from: usize, to: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..64, 1usize..5).prop_map(|(start, count)| Op::Insert { start, count }),
        (0usize..64, 1usize..5).prop_map(|(start, count)| Op::Remove { start, count }),
        (0usize..64, 0usize..64).prop_map(|(from, to)| Op::Move { from, to }),
    ]
}

/// Apply `op` to the model, clamped to its length, and return the change
/// notification a data source would send.
fn apply_to_model(items: &mut Vec<u32>, next_id: &mut u32, op: Op) -> Option<ItemChange> {
    match op {
        Op::Insert { start, count } => {
            let start = start % (items.len() + 1);
            for i in 0..count {
                items.insert(start + i, *next_id);
                *next_id += 1;
            }
            Some(ItemChange::Inserted { start, count })
        }
        Op::Remove { start, count } => {
            if items.is_empty() {
                return None;
            }
            let start = start % items.len();
            let count = count.min(items.len() - start);
            items.drain(start..start + count);
            Some(ItemChange::Removed { start, count })
        }
        Op::Move { from, to } => {
            if items.is_empty() {
                return None;
            }
            let from = from % items.len();
            let to = to % items.len();
            let item = items.remove(from);
            items.insert(to, item);
            Some(ItemChange::Moved { from, to, count: 1 })
        }
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &i in order {
        if i >= order.len() || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

fn saved_selection_strategy() -> impl Strategy<Value = SavedSelection> {
    (
        proptest::option::of(0usize..10_000),
        proptest::collection::btree_map(
            0usize..500,
            proptest::collection::vec(any::<u8>(), 0..32),
            0..8,
        ),
        proptest::option::of(proptest::collection::vec(any::<u8>(), 0..64)),
    )
        .prop_map(|(index, child_states, global)| SavedSelection {
            index,
            child_states,
            global,
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Tracker follows the focused item
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tracker_follows_focused_item(
        initial in 1usize..40,
        focus_seed in any::<usize>(),
        ops in proptest::collection::vec(op_strategy(), 0..12),
    ) {
        let mut items: Vec<u32> = (0..initial as u32).collect();
        let mut next_id = initial as u32;
        let focus = focus_seed % initial;
        let focused_id = items[focus];

        let mut tracker = FocusPositionTracker::new();
        tracker.set_focus(Some(focus));

        for op in ops {
            if let Some(change) = apply_to_model(&mut items, &mut next_id, op) {
                tracker.apply(change);
            }
        }

        let expected = items.iter().position(|&id| id == focused_id);
        // Once lost, an item never comes back; ids are never reused.
        prop_assert_eq!(tracker.pending_position(), expected);

        match (tracker.commit(), expected) {
            (CommitOutcome::Unchanged(p), Some(e)) => prop_assert_eq!(p, e),
            (CommitOutcome::Shifted { from, to }, Some(e)) => {
                prop_assert_eq!(from, focus);
                prop_assert_eq!(to, e);
            }
            (CommitOutcome::Indeterminate { last_known }, None) => {
                prop_assert_eq!(last_known, focus);
            }
            (outcome, expected) => {
                prop_assert!(false, "commit {:?} for expected {:?}", outcome, expected);
            }
        }
    }

    #[test]
    fn batched_commit_matches_interleaved(
        initial in 1usize..40,
        focus_seed in any::<usize>(),
        ops in proptest::collection::vec(op_strategy(), 0..12),
    ) {
        let mut items: Vec<u32> = (0..initial as u32).collect();
        let mut next_id = initial as u32;
        let focus = focus_seed % initial;

        let mut batched = FocusPositionTracker::new();
        batched.set_focus(Some(focus));
        let mut interleaved = batched;
        let mut lost = false;

        for op in ops {
            if let Some(change) = apply_to_model(&mut items, &mut next_id, op) {
                batched.apply(change);
                interleaved.apply(change);
                if let CommitOutcome::Indeterminate { .. } = interleaved.commit() {
                    lost = true;
                    break;
                }
            }
        }

        let batched = batched.commit();
        if lost {
            let is_indeterminate = matches!(batched, CommitOutcome::Indeterminate { .. });
            prop_assert!(is_indeterminate);
        } else {
            prop_assert_eq!(batched.position(), interleaved.focus());
        }
    }

    #[test]
    fn commit_is_idempotent(
        focus in 0usize..50,
        start in 0usize..50,
        count in 0usize..10,
    ) {
        let mut tracker = FocusPositionTracker::new();
        tracker.set_focus(Some(focus));
        tracker.apply(ItemChange::Inserted { start, count });
        let first = tracker.commit();
        let second = tracker.commit();
        prop_assert_eq!(second, CommitOutcome::Unchanged(first.position().unwrap_or(focus)));
    }

    #[test]
    fn data_set_change_forgets_offsets(
        focus in 0usize..50,
        ops in proptest::collection::vec((0usize..50, 1usize..5), 0..6),
    ) {
        let mut tracker = FocusPositionTracker::new();
        tracker.set_focus(Some(focus));
        for (start, count) in ops {
            tracker.apply(ItemChange::Removed { start, count });
        }
        tracker.apply(ItemChange::DataSetChanged);
        prop_assert_eq!(tracker.commit(), CommitOutcome::Unchanged(focus));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Pending moves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pending_moves_bounded_and_settle_on_zero(
        steps in proptest::collection::vec(prop_oneof![Just(1i32), Just(-1i32)], 0..64),
    ) {
        let mut pending = PendingMoveCoordinator::new();
        let mut expected_settles = 0;
        let mut settles = 0;
        for step in steps {
            let before = pending.pending();
            let outcome = pending.request_move(step);
            prop_assert!(outcome.pending.abs() <= MAX_PENDING_MOVES);
            prop_assert_eq!(outcome.pending, pending.pending());
            prop_assert_eq!(outcome.accepted, outcome.pending != before);
            if before != 0 && outcome.pending == 0 {
                expected_settles += 1;
            }
            if outcome.settled {
                settles += 1;
            }
        }
        prop_assert_eq!(settles, expected_settles);
    }

    #[test]
    fn consuming_drains_towards_zero(moves in -MAX_PENDING_MOVES..=MAX_PENDING_MOVES) {
        let mut pending = PendingMoveCoordinator::new();
        let step = moves.signum();
        for _ in 0..moves.abs() {
            pending.request_move(step);
        }
        let mut consumed = 0;
        while let Some(sign) = pending.consume_one() {
            prop_assert_eq!(sign, step);
            consumed += 1;
        }
        prop_assert_eq!(consumed, moves.abs());
        prop_assert_eq!(pending.pending(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Draw order is a permutation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn draw_order_is_permutation(
        count in 0usize..64,
        focused in proptest::option::of(0usize..80),
        swap in any::<bool>(),
    ) {
        let policy = if swap { DrawOrderPolicy::SwapToFront } else { DrawOrderPolicy::FanOut };
        let order: Vec<usize> = (0..count).map(|i| policy.order(count, i, focused)).collect();
        prop_assert!(is_permutation(&order), "{:?}", order);
        if let Some(f) = focused.filter(|&f| f < count) {
            prop_assert_eq!(order.last().copied(), Some(f));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Child-state retention bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn limited_retention_never_exceeds_limit(
        limit in 0usize..8,
        positions in proptest::collection::vec(0usize..32, 0..64),
    ) {
        let mut states = ChildStates::new(SavePolicy::Limited(limit));
        for &position in &positions {
            states.save_off_screen(position, vec![position as u8]);
            prop_assert!(states.len() <= limit);
        }
        if limit > 0 && let Some(&last) = positions.last() {
            prop_assert_eq!(states.get(last), Some(&[last as u8][..]));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Codec
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn saved_selection_survives_codec(saved in saved_selection_strategy()) {
        let bytes = SelectionStateCodec::encode(&VersionedState::new(1, saved.clone())).unwrap();
        let decoded = SelectionStateCodec::decode(&bytes, 1).unwrap();
        prop_assert_eq!(decoded, saved);
    }

    #[test]
    fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = SelectionStateCodec::decode(&bytes, 1);
    }
}

#[test]
fn child_state_map_keys_stay_numeric() {
    let mut child_states = BTreeMap::new();
    child_states.insert(12usize, b"x".to_vec());
    let saved = SavedSelection {
        index: Some(3),
        child_states,
        global: None,
    };
    let bytes = SelectionStateCodec::encode(&VersionedState::new(1, saved)).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("\"12\":\"eA==\""), "{text}");
}
