#![forbid(unsafe_code)]

//! Immutable per-grid configuration.

use tvgrid_core::geometry::{Edges, Grid, Orientation};

use crate::child_states::SavePolicy;
use crate::draw_order::DrawOrderPolicy;

/// What to select when the focused item disappeared before a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FallbackPolicy {
    /// Keep the last known position, clamped into the new item range.
    #[default]
    Clamp,
    /// Select the first item.
    First,
    /// Select nothing.
    Clear,
}

impl FallbackPolicy {
    /// Resolve a fallback selection for `last_known` in a grid of `item_count`.
    #[must_use]
    pub const fn resolve(self, last_known: usize, item_count: usize) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        match self {
            Self::Clamp => Some(if last_known < item_count {
                last_known
            } else {
                item_count - 1
            }),
            Self::First => Some(0),
            Self::Clear => None,
        }
    }
}

/// Configuration for a [`GridView`](crate::grid_view::GridView).
///
/// Fields are public for reading; the same-named builder methods return an
/// updated copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Parallel tracks. Always at least 1.
    pub span_count: usize,
    /// Scrolling axis.
    pub orientation: Orientation,
    /// Lay items out from the far end of the primary axis.
    pub reverse_layout: bool,
    /// Edges focus may leave the grid through.
    pub focus_exits: Edges,
    /// Selection policy after the focused item is removed.
    pub fallback: FallbackPolicy,
    /// Paint order of attached children.
    pub draw_order: DrawOrderPolicy,
    /// Which child states are retained.
    pub child_state_policy: SavePolicy,
    /// Request more data when navigation hits the last line.
    pub can_load_more: bool,
    /// Lines to scroll per pending move when the target is not yet attached.
    pub scroll_step: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            span_count: 1,
            orientation: Orientation::Vertical,
            reverse_layout: false,
            focus_exits: Edges::all(),
            fallback: FallbackPolicy::Clamp,
            draw_order: DrawOrderPolicy::FanOut,
            child_state_policy: SavePolicy::OnScreen,
            can_load_more: false,
            scroll_step: 1,
        }
    }
}

impl GridConfig {
    /// Set the number of tracks (clamped to at least 1).
    #[must_use]
    pub fn span_count(mut self, span_count: usize) -> Self {
        self.span_count = span_count.max(1);
        self
    }

    /// Set the scrolling axis.
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Lay items out from the far end of the primary axis.
    #[must_use]
    pub fn reverse_layout(mut self, reverse_layout: bool) -> Self {
        self.reverse_layout = reverse_layout;
        self
    }

    /// Set the edges focus may leave through.
    #[must_use]
    pub fn focus_exits(mut self, focus_exits: Edges) -> Self {
        self.focus_exits = focus_exits;
        self
    }

    /// Set the fallback selection policy.
    #[must_use]
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the child paint order.
    #[must_use]
    pub fn draw_order(mut self, draw_order: DrawOrderPolicy) -> Self {
        self.draw_order = draw_order;
        self
    }

    /// Set which child states are retained.
    #[must_use]
    pub fn child_state_policy(mut self, policy: SavePolicy) -> Self {
        self.child_state_policy = policy;
        self
    }

    /// Enable paging.
    #[must_use]
    pub fn can_load_more(mut self, can_load_more: bool) -> Self {
        self.can_load_more = can_load_more;
        self
    }

    /// Set lines scrolled per pending move (clamped to at least 1).
    #[must_use]
    pub fn scroll_step(mut self, scroll_step: i32) -> Self {
        self.scroll_step = scroll_step.max(1);
        self
    }

    /// Grid shape for `item_count` items under this configuration.
    #[must_use]
    pub fn grid(&self, item_count: usize) -> Grid {
        Grid::new(item_count, self.span_count, self.orientation)
    }
}
