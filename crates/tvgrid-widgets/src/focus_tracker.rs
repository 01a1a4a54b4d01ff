#![forbid(unsafe_code)]

//! Keeps the focus position valid across data-set mutations.
//!
//! Mutations arrive between layout passes. Rather than move the committed
//! position on every callback, the tracker accumulates a signed offset and
//! applies it once, at the start of the next layout pass ([`commit`]).
//!
//! # Invariants
//!
//! 1. `focus + offset` is always the tracked item's position in the data set
//!    as of the last applied mutation.
//! 2. Once the tracked item itself is removed, the offset is
//!    [`FocusOffset::Indeterminate`] and every further mutation is ignored
//!    until the next commit.
//! 3. A commit always leaves the offset at `Delta(0)`.
//!
//! # Failure Modes
//!
//! An indeterminate commit keeps the last known position and reports
//! [`CommitOutcome::Indeterminate`]; the caller must pick a fallback.
//!
//! [`commit`]: FocusPositionTracker::commit

use tvgrid_core::event::ItemChange;

/// Correction not yet applied to the committed focus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusOffset {
    /// Shift the focus by this many positions at the next commit.
    Delta(isize),
    /// The focused item was removed; no position can be derived.
    Indeterminate,
}

impl Default for FocusOffset {
    fn default() -> Self {
        Self::Delta(0)
    }
}

/// Result of a per-layout commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitOutcome {
    /// Nothing is focused.
    NoFocus,
    /// The focus position did not move.
    Unchanged(usize),
    /// The focus position moved.
    Shifted { from: usize, to: usize },
    /// The focused item is gone; `last_known` is the stale position.
    Indeterminate { last_known: usize },
}

impl CommitOutcome {
    /// The committed position, if it is still meaningful.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match *self {
            Self::Unchanged(p) | Self::Shifted { to: p, .. } => Some(p),
            Self::NoFocus | Self::Indeterminate { .. } => None,
        }
    }
}

/// Focus position plus deferred mutation offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusPositionTracker {
    focus: Option<usize>,
    offset: FocusOffset,
}

impl FocusPositionTracker {
    /// Create a tracker with nothing focused.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed focus position.
    #[inline]
    #[must_use]
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Uncommitted offset.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> FocusOffset {
        self.offset
    }

    /// Where the focused item is right now, with pending mutations applied.
    #[must_use]
    pub fn pending_position(&self) -> Option<usize> {
        match self.offset {
            FocusOffset::Delta(delta) => self.focus?.checked_add_signed(delta),
            FocusOffset::Indeterminate => None,
        }
    }

    /// Move focus to `position`, given in current (post-mutation)
    /// coordinates. Any other position than the tracked item's current one
    /// discards the pending offset.
    pub fn set_focus(&mut self, position: Option<usize>) {
        if position.is_none() || self.pending_position() != position {
            self.focus = position;
            self.offset = FocusOffset::Delta(0);
        }
    }

    /// Forget focus entirely (new data set).
    pub fn reset(&mut self) {
        self.focus = None;
        self.offset = FocusOffset::Delta(0);
    }

    /// Fold one mutation into the pending offset.
    ///
    /// Mutations must be applied in delivery order.
    pub fn apply(&mut self, change: ItemChange) {
        if let ItemChange::DataSetChanged = change {
            self.offset = FocusOffset::Delta(0);
            return;
        }
        let (Some(focus), Some(pos)) = (self.focus, self.pending_position()) else {
            return;
        };
        self.offset = match shift_position(pos, change) {
            Some(to) => FocusOffset::Delta(signed(to) - signed(focus)),
            None => FocusOffset::Indeterminate,
        };
    }

    /// Apply the pending offset. Runs once per layout pass.
    pub fn commit(&mut self) -> CommitOutcome {
        let offset = std::mem::take(&mut self.offset);
        let Some(from) = self.focus else {
            return CommitOutcome::NoFocus;
        };
        let delta = match offset {
            FocusOffset::Delta(0) => return CommitOutcome::Unchanged(from),
            FocusOffset::Delta(delta) => delta,
            FocusOffset::Indeterminate => return CommitOutcome::Indeterminate { last_known: from },
        };
        match from.checked_add_signed(delta) {
            Some(to) => {
                self.focus = Some(to);
                CommitOutcome::Shifted { from, to }
            }
            None => CommitOutcome::Indeterminate { last_known: from },
        }
    }
}

/// Where the item at `position` sits after `change`, or `None` if the change
/// removed it.
///
/// `DataSetChanged` and `Updated` carry no positional information and leave
/// the position as it is.
#[must_use]
pub fn shift_position(position: usize, change: ItemChange) -> Option<usize> {
    match change {
        ItemChange::Inserted { start, count } if start <= position => {
            Some(position.saturating_add(count))
        }
        ItemChange::Removed { start, count } if start <= position => {
            (start.saturating_add(count) <= position).then(|| position - count)
        }
        ItemChange::Moved { from, to, count } => {
            if from <= position && position < from.saturating_add(count) {
                Some(to.saturating_add(position - from))
            } else if from < position && to.saturating_add(count) > position {
                Some(position.saturating_sub(count))
            } else if from > position && to <= position {
                Some(position.saturating_add(count))
            } else {
                Some(position)
            }
        }
        _ => Some(position),
    }
}

fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused(p: usize) -> FocusPositionTracker {
        let mut t = FocusPositionTracker::new();
        t.set_focus(Some(p));
        t
    }

    #[test]
    fn insert_before_shifts() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 2, count: 3 });
        assert_eq!(t.pending_position(), Some(8));
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 5, to: 8 });
        assert_eq!(t.offset(), FocusOffset::Delta(0));
    }

    #[test]
    fn insert_at_focus_shifts() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 5, count: 1 });
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 5, to: 6 });
    }

    #[test]
    fn insert_after_is_ignored() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 6, count: 4 });
        assert_eq!(t.commit(), CommitOutcome::Unchanged(5));
    }

    #[test]
    fn remove_before_shifts_back() {
        let mut t = focused(3);
        t.apply(ItemChange::Removed { start: 1, count: 2 });
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 3, to: 1 });
    }

    #[test]
    fn remove_covering_focus_is_indeterminate() {
        let mut t = focused(3);
        t.apply(ItemChange::Removed { start: 2, count: 2 });
        assert_eq!(t.offset(), FocusOffset::Indeterminate);
        assert_eq!(t.pending_position(), None);
        // Later mutations are ignored until the commit.
        t.apply(ItemChange::Inserted { start: 0, count: 5 });
        assert_eq!(t.offset(), FocusOffset::Indeterminate);
        assert_eq!(t.commit(), CommitOutcome::Indeterminate { last_known: 3 });
        assert_eq!(t.focus(), Some(3));
        assert_eq!(t.offset(), FocusOffset::Delta(0));
    }

    #[test]
    fn move_focused_block() {
        let mut t = focused(4);
        t.apply(ItemChange::Moved {
            from: 3,
            to: 7,
            count: 2,
        });
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 4, to: 8 });
    }

    #[test]
    fn move_block_from_before_to_after() {
        // [0 1 2 3 4 5 6] move 1..3 so it starts at 4: [0 3 4 5 1 2 6]
        let mut t = focused(5);
        t.apply(ItemChange::Moved {
            from: 1,
            to: 4,
            count: 2,
        });
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 5, to: 3 });
    }

    #[test]
    fn move_block_from_after_to_before() {
        // [0 1 2 3 4 5 6] move 4..6 so it starts at 1: [0 4 5 1 2 3 6]
        let mut t = focused(2);
        t.apply(ItemChange::Moved {
            from: 4,
            to: 1,
            count: 2,
        });
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 2, to: 4 });
    }

    #[test]
    fn move_block_onto_focus_slot() {
        // [0 1 2 3 4] move 3..4 so it starts at 1: [0 3 1 2 4]
        let mut t = focused(1);
        t.apply(ItemChange::Moved {
            from: 3,
            to: 1,
            count: 1,
        });
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 1, to: 2 });
    }

    #[test]
    fn move_elsewhere_is_ignored() {
        let mut t = focused(1);
        t.apply(ItemChange::Moved {
            from: 4,
            to: 6,
            count: 2,
        });
        assert_eq!(t.commit(), CommitOutcome::Unchanged(1));
    }

    #[test]
    fn update_keeps_position() {
        let mut t = focused(2);
        t.apply(ItemChange::Updated { start: 0, count: 10 });
        assert_eq!(t.commit(), CommitOutcome::Unchanged(2));
    }

    #[test]
    fn data_set_changed_clears_offset() {
        let mut t = focused(2);
        t.apply(ItemChange::Removed { start: 2, count: 1 });
        t.apply(ItemChange::DataSetChanged);
        assert_eq!(t.commit(), CommitOutcome::Unchanged(2));
    }

    #[test]
    fn offsets_accumulate_before_commit() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 0, count: 2 });
        t.apply(ItemChange::Removed { start: 0, count: 1 });
        t.apply(ItemChange::Inserted { start: 10, count: 3 });
        assert_eq!(t.offset(), FocusOffset::Delta(1));
        assert_eq!(t.commit(), CommitOutcome::Shifted { from: 5, to: 6 });
    }

    #[test]
    fn mutations_without_focus_are_ignored() {
        let mut t = FocusPositionTracker::new();
        t.apply(ItemChange::Inserted { start: 0, count: 5 });
        assert_eq!(t.commit(), CommitOutcome::NoFocus);
    }

    #[test]
    fn set_focus_discards_offset_only_on_change() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 0, count: 1 });
        // Same item, already in current coordinates.
        t.set_focus(Some(6));
        assert_eq!(t.offset(), FocusOffset::Delta(1));
        assert_eq!(t.pending_position(), Some(6));
        t.set_focus(Some(2));
        assert_eq!(t.offset(), FocusOffset::Delta(0));
        assert_eq!(t.focus(), Some(2));
    }

    #[test]
    fn set_focus_on_stale_position_uses_current_coordinates() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 0, count: 1 });
        // Position 5 now holds the item that used to sit at 4.
        t.set_focus(Some(5));
        assert_eq!(t.offset(), FocusOffset::Delta(0));
        assert_eq!(t.commit(), CommitOutcome::Unchanged(5));

        t.apply(ItemChange::Removed { start: 5, count: 1 });
        t.set_focus(None);
        assert_eq!(t.commit(), CommitOutcome::NoFocus);
    }

    #[test]
    fn shift_position_follows_the_item() {
        assert_eq!(shift_position(5, ItemChange::Inserted { start: 5, count: 2 }), Some(7));
        assert_eq!(shift_position(5, ItemChange::Inserted { start: 6, count: 2 }), Some(5));
        assert_eq!(shift_position(5, ItemChange::Removed { start: 1, count: 2 }), Some(3));
        assert_eq!(shift_position(5, ItemChange::Removed { start: 4, count: 2 }), None);
        assert_eq!(shift_position(5, ItemChange::Removed { start: 6, count: 9 }), Some(5));
        assert_eq!(
            shift_position(4, ItemChange::Moved { from: 3, to: 7, count: 2 }),
            Some(8)
        );
        assert_eq!(shift_position(5, ItemChange::Updated { start: 5, count: 1 }), Some(5));
        assert_eq!(shift_position(5, ItemChange::DataSetChanged), Some(5));
    }

    #[test]
    fn reset_forgets_focus() {
        let mut t = focused(5);
        t.apply(ItemChange::Inserted { start: 0, count: 1 });
        t.reset();
        assert_eq!(t.focus(), None);
        assert_eq!(t.commit(), CommitOutcome::NoFocus);
    }

    #[test]
    fn commit_outcome_position() {
        assert_eq!(CommitOutcome::Unchanged(3).position(), Some(3));
        assert_eq!(CommitOutcome::Shifted { from: 1, to: 4 }.position(), Some(4));
        assert_eq!(CommitOutcome::Indeterminate { last_known: 2 }.position(), None);
        assert_eq!(CommitOutcome::NoFocus.position(), None);
    }
}
