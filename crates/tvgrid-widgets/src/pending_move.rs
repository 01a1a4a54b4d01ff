#![forbid(unsafe_code)]

//! Coalesces rapid primary-axis navigation into one smooth scroll.
//!
//! Holding a direction key produces a burst of requests far faster than a
//! scroll animation can reveal new items. Each request bumps a signed pending
//! count instead of moving focus immediately; focus then walks one line at a
//! time as the scroll brings the next item into view ([`consume_one`]).
//!
//! # Invariants
//!
//! 1. `pending` stays within `[-MAX_PENDING_MOVES, MAX_PENDING_MOVES]`.
//!    Requests beyond the bound are dropped.
//! 2. A transition from nonzero to exactly zero reports `settled` once. A
//!    transition away from zero never does.
//! 3. With zero pending moves there is no scroll vector.
//! 4. Data-set mutations move the target with its item and never touch the
//!    pending count. A target whose item was removed is dropped.
//!
//! # Sign Convention
//!
//! Positive `pending` means "towards higher positions". The scroll vector
//! maps that back to screen space, flipping it for a reversed layout.
//!
//! [`consume_one`]: PendingMoveCoordinator::consume_one

use tvgrid_core::event::ItemChange;
use tvgrid_core::geometry::Orientation;

use crate::focus_tracker::shift_position;

/// Upper bound on queued moves in either direction.
pub const MAX_PENDING_MOVES: i32 = 10;

/// Result of a [`PendingMoveCoordinator::request_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveOutcome {
    /// Pending count after the request.
    pub pending: i32,
    /// Whether the request changed the count (false at the bound).
    pub accepted: bool,
    /// Whether the count just returned to zero.
    pub settled: bool,
}

/// Unit direction of the coalesced scroll, in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollVector {
    pub dx: i32,
    pub dy: i32,
}

impl ScrollVector {
    /// Scale the unit vector to a pixel distance.
    #[must_use]
    pub const fn scaled(self, distance: i32) -> (i32, i32) {
        (
            self.dx.saturating_mul(distance),
            self.dy.saturating_mul(distance),
        )
    }
}

/// Result of [`PendingMoveCoordinator::on_stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopOutcome {
    /// Moves were still pending, so the selection settles now.
    pub settled: bool,
    /// Position to re-center on, if a target was set.
    pub corrective_target: Option<usize>,
}

/// Pending-move accumulator plus the position the scroll is heading for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingMoveCoordinator {
    pending: i32,
    target: Option<usize>,
}

impl PendingMoveCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Net pending moves.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> i32 {
        self.pending
    }

    /// Position the in-flight scroll is heading for.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Set the scroll target. A new target replaces the old one.
    pub fn set_target(&mut self, target: Option<usize>) {
        self.target = target;
    }

    /// Whether a coalesced scroll is in flight.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pending != 0 || self.target.is_some()
    }

    /// Queue one move. `step > 0` heads towards higher positions, `step < 0`
    /// towards lower ones; zero is ignored.
    pub fn request_move(&mut self, step: i32) -> MoveOutcome {
        let before = self.pending;
        if step > 0 && self.pending < MAX_PENDING_MOVES {
            self.pending += 1;
        } else if step < 0 && self.pending > -MAX_PENDING_MOVES {
            self.pending -= 1;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            pending = self.pending,
            target = ?self.target,
            "pending_move.request"
        );
        MoveOutcome {
            pending: self.pending,
            accepted: self.pending != before,
            settled: before != 0 && self.pending == 0,
        }
    }

    /// Direction to keep scrolling in, or `None` once nothing is pending.
    #[must_use]
    pub fn scroll_vector(&self, orientation: Orientation, reverse_layout: bool) -> Option<ScrollVector> {
        if self.pending == 0 {
            return None;
        }
        let backwards = if reverse_layout {
            self.pending > 0
        } else {
            self.pending < 0
        };
        let unit = if backwards { -1 } else { 1 };
        let (dx, dy) = orientation.axis_vector(unit);
        Some(ScrollVector { dx, dy })
    }

    /// Consume one pending move because focus advanced a line.
    ///
    /// Returns the sign of the consumed move, or `None` when idle. The
    /// selection has settled when [`pending`](Self::pending) is zero after
    /// a `Some`.
    pub fn consume_one(&mut self) -> Option<i32> {
        let step = self.pending.signum();
        if step == 0 {
            return None;
        }
        self.pending -= step;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            pending = self.pending,
            target = ?self.target,
            "pending_move.consume"
        );
        Some(step)
    }

    /// The scroll animation stopped, possibly against a boundary.
    ///
    /// Leftover moves are discarded; the caller re-centers on the target.
    pub fn on_stop(&mut self) -> StopOutcome {
        let settled = self.pending != 0;
        self.pending = 0;
        StopOutcome {
            settled,
            corrective_target: self.target.take(),
        }
    }

    /// Keep the target on the same item across a data-set mutation.
    ///
    /// Queued moves survive; only a removed target is dropped.
    pub fn apply(&mut self, change: ItemChange) {
        if let Some(target) = self.target {
            self.target = shift_position(target, change);
            #[cfg(feature = "tracing")]
            tracing::trace!(
                ?change,
                from = target,
                to = ?self.target,
                pending = self.pending,
                "pending_move.retarget"
            );
        }
    }

    /// Drop pending moves and the target without settling.
    pub fn cancel(&mut self) {
        self.pending = 0;
        self.target = None;
    }
}
