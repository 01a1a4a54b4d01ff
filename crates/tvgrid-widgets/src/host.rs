#![forbid(unsafe_code)]

//! Capability traits implemented by the surrounding container.
//!
//! The engine never owns views, scroll animations, or data. It reaches them
//! through three narrow capabilities:
//!
//! - [`ViewProvider`]: live item views, their bounds, and input focus.
//! - [`ScrollDriver`]: smooth scrolling and the current scroll phase.
//! - [`ItemSource`]: item count and stable identity.
//!
//! [`GridHost`] is blanket-implemented for anything providing all three, so
//! engine operations take a single `&mut impl GridHost`.

use core::fmt::Debug;

use tvgrid_core::geometry::Rect;

/// Stable identity of a data item.
pub type ItemId = u64;

/// Access to the views currently attached to the container.
pub trait ViewProvider {
    /// Handle to an attached item view.
    type View: Copy + Eq + Debug;

    /// The attached view showing `position`, if any.
    fn find_view_at(&self, position: usize) -> Option<Self::View>;

    /// The attached view showing the item with stable id `id`, if any.
    fn find_view_by_id(&self, id: ItemId) -> Option<Self::View>;

    /// Move input focus to `view`. Returns `false` if the view refused focus.
    fn request_focus(&mut self, view: Self::View) -> bool;

    /// The attached view that currently holds input focus.
    fn focused_view(&self) -> Option<Self::View>;

    /// Whether focus is anywhere inside the container.
    fn has_focus(&self) -> bool {
        self.focused_view().is_some()
    }

    /// Bounds of `view` in container coordinates.
    fn bounds(&self, view: Self::View) -> Option<Rect>;

    /// Visible area of the container.
    fn viewport(&self) -> Rect;

    /// Number of attached views, in paint order.
    fn child_count(&self) -> usize;

    /// The attached view at paint index `index`.
    fn child_at(&self, index: usize) -> Option<Self::View>;

    /// Paint index of `view`.
    fn child_index(&self, view: Self::View) -> Option<usize>;

    /// Adapter position `view` is bound to.
    fn position_of(&self, view: Self::View) -> Option<usize>;

    /// Capture transient per-view state (scroll offset, expansion, ...).
    fn save_view_state(&self, _view: Self::View) -> Option<Vec<u8>> {
        None
    }

    /// Reapply state captured by [`save_view_state`](Self::save_view_state).
    fn restore_view_state(&mut self, _view: Self::View, _state: &[u8]) {}
}

/// Phase of the container's scroll animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollState {
    /// Not scrolling.
    #[default]
    Idle,
    /// Scrolling under direct user control.
    Dragging,
    /// Animating towards a final position.
    Settling,
}

/// Drives the container's scroll animation.
pub trait ScrollDriver {
    /// Start (or extend) a smooth scroll by the given pixel distance.
    fn smooth_scroll_by(&mut self, dx: i32, dy: i32);

    /// Current scroll phase.
    fn scroll_state(&self) -> ScrollState;

    /// Abort any in-flight scroll animation.
    fn stop_scroll(&mut self);
}

/// The data set bound to the container.
pub trait ItemSource {
    /// Number of items.
    fn item_count(&self) -> usize;

    /// Whether ids survive position-changing mutations.
    fn has_stable_ids(&self) -> bool {
        false
    }

    /// Stable id of the item at `position`.
    fn id_at(&self, position: usize) -> Option<ItemId>;
}

/// Everything a [`GridView`](crate::grid_view::GridView) needs from its container.
pub trait GridHost: ViewProvider + ScrollDriver + ItemSource {}

impl<T: ViewProvider + ScrollDriver + ItemSource> GridHost for T {}
