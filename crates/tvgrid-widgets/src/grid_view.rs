#![forbid(unsafe_code)]

//! The grid focus engine.
//!
//! [`GridView`] owns the focus tracker, focus memory, pending-move
//! coordinator, child-state store and paging controller for one container,
//! and exposes the operations the container calls as events arrive.
//!
//! # Event Flow
//!
//! ```text
//! key / direction ──► on_directional_input ──► edge? ──► Blocked / Exit
//!                                 │
//!                                 ├─ cross axis ──► focus neighbor directly
//!                                 └─ primary axis ─► pending moves + scroll
//! scroll tick ──────► advance focus line by line as items are revealed
//! scroll idle ──────► settle leftovers, re-center, archive focus
//! item change ──────► tracker offset, retarget, child states, relayout request
//! layout pass ──────► commit, fallback, pending selection, scroll to focus
//! ```
//!
//! Outbound notifications are queued as [`GridNotice`] values and drained by
//! the container with [`GridView::take_notices`].
//!
//! # Invariants
//!
//! 1. Mutations are folded into the tracker in delivery order and committed
//!    only by [`GridView::on_layout`].
//! 2. [`GridNotice::SelectionSettled`] is queued once per coalesced gesture,
//!    never once per key repeat. Data-set mutations arriving mid-gesture do
//!    not end the gesture.
//! 3. Swapping the data source discards all position and identity
//!    bookkeeping.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Focused item removed | Remove spanning the focus | [`FallbackPolicy`](crate::config::FallbackPolicy), [`GridNotice::FallbackApplied`] |
//! | Corrupt saved state | Foreign or truncated blob | Empty state (logged) |
//! | Target view not attached | Item scrolled away | Scroll by line, select on reveal |
//! | Scroll target removed | Remove spanning the target mid-gesture | Finish the queued moves by line |

use core::fmt::Debug;

use tvgrid_core::event::{ItemChange, KeyEvent, NavDirection};
use tvgrid_core::geometry::{Edges, Grid, Orientation};

use crate::child_states::ChildStates;
use crate::config::GridConfig;
use crate::focus_memory::{FocusMemory, FocusTarget};
use crate::focus_tracker::{CommitOutcome, FocusPositionTracker};
use crate::host::{GridHost, ItemId, ItemSource, ScrollState, ViewProvider};
use crate::load_more::{LoadMoreAction, LoadMoreController};
use crate::pending_move::PendingMoveCoordinator;
use crate::selection_state::{CodecError, SavedSelection, SelectionStateCodec};
use crate::stateful::{StateKey, Stateful, VersionedState};

/// The item a notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection<V> {
    /// Attached view for the item, if any.
    pub view: Option<V>,
    /// Adapter position, `None` when nothing is selected.
    pub position: Option<usize>,
    /// Stable id of the item.
    pub item_id: Option<ItemId>,
}

impl<V> Selection<V> {
    /// A selection of nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            view: None,
            position: None,
            item_id: None,
        }
    }
}

/// Outbound notification for the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridNotice<V> {
    /// Navigation came to rest on this item.
    SelectionSettled(Selection<V>),
    /// Focus moved to this item.
    ItemSelected(Selection<V>),
    /// A coalesced move is heading for this item.
    ItemPreSelected(Selection<V>),
    /// The focused item was activated.
    ItemClicked(Selection<V>),
    /// Paging request for the host.
    LoadMore(LoadMoreAction),
    /// The engine needs a layout pass.
    LayoutRequested,
    /// The focused item disappeared and a fallback selection was made.
    FallbackApplied {
        last_known: usize,
        selected: Option<usize>,
    },
}

/// Result of a directional command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputOutcome {
    /// Focus moved (or settled) on `target`.
    Moved { target: usize },
    /// The move was queued behind an in-flight scroll.
    Pending { pending: i32, target: usize },
    /// An edge was reached and focus stays inside the grid.
    Blocked(NavDirection),
    /// An edge was reached and focus may leave the grid.
    Exit(NavDirection),
    /// The focused item was activated.
    Activated(usize),
    /// The grid had nothing to do with the input.
    Ignored,
}

impl InputOutcome {
    /// Whether navigation ran into an edge of the grid.
    #[must_use]
    pub const fn is_intercepted(&self) -> bool {
        matches!(self, Self::Blocked(_) | Self::Exit(_))
    }
}

/// Result of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutOutcome {
    /// What the tracker commit produced.
    pub commit: CommitOutcome,
    /// Selected position after the pass.
    pub selected: Option<usize>,
    /// Whether a fallback selection was applied.
    pub fallback_applied: bool,
    /// Whether a scroll was issued to bring the selection into view.
    pub scrolled: bool,
}

/// Inbound event for [`GridView::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent<V> {
    Key(KeyEvent),
    Direction(NavDirection),
    ChildFocusGained(usize),
    ChildFocusLost(usize),
    ContainerFocusGained,
    ScrollTick,
    ScrollStateChanged(ScrollState),
    ItemsChanged(ItemChange),
    AdapterChanged,
    Layout,
    ChildAttached { view: V, position: usize },
    ChildDetached { view: V, position: usize },
}

/// Result of [`GridView::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleOutcome {
    Input(InputOutcome),
    Layout(LayoutOutcome),
    Focused(Option<usize>),
    Done,
}

/// Focus, selection and scroll coordination for one grid container.
#[derive(Debug, Clone)]
pub struct GridView<V> {
    config: GridConfig,
    grid: Grid,
    tracker: FocusPositionTracker,
    memory: FocusMemory,
    pending: PendingMoveCoordinator,
    child_states: ChildStates,
    load_more: LoadMoreController,
    pending_selection: Option<usize>,
    global_state: Option<Vec<u8>>,
    has_laid_out: bool,
    notices: Vec<GridNotice<V>>,
    state_id: String,
}

impl<V: Copy + Eq + Debug> Default for GridView<V> {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl<V: Copy + Eq + Debug> GridView<V> {
    /// Create an engine with no data.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            grid: config.grid(0),
            tracker: FocusPositionTracker::new(),
            memory: FocusMemory::new(),
            pending: PendingMoveCoordinator::new(),
            child_states: ChildStates::new(config.child_state_policy),
            load_more: LoadMoreController::new(config.can_load_more),
            pending_selection: None,
            global_state: None,
            has_laid_out: false,
            notices: Vec::new(),
            state_id: String::from("grid"),
            config,
        }
    }

    /// Set the instance id used in this grid's [`StateKey`].
    #[must_use]
    pub fn with_state_id(mut self, id: impl Into<String>) -> Self {
        self.state_id = id.into();
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Active configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Grid shape as of the last layout pass or data change.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Focus position tracker.
    #[inline]
    #[must_use]
    pub fn tracker(&self) -> &FocusPositionTracker {
        &self.tracker
    }

    /// Last-focused-item memory.
    #[inline]
    #[must_use]
    pub fn focus_memory(&self) -> &FocusMemory {
        &self.memory
    }

    /// Pending-move coordinator.
    #[inline]
    #[must_use]
    pub fn pending_moves(&self) -> &PendingMoveCoordinator {
        &self.pending
    }

    /// Retained child state.
    #[inline]
    #[must_use]
    pub fn child_states(&self) -> &ChildStates {
        &self.child_states
    }

    /// Paging controller.
    #[inline]
    #[must_use]
    pub fn load_more(&self) -> &LoadMoreController {
        &self.load_more
    }

    /// Paging controller, for the host's `notify_*` calls.
    #[inline]
    pub fn load_more_mut(&mut self) -> &mut LoadMoreController {
        &mut self.load_more
    }

    /// Container-level state blob persisted with the selection.
    #[inline]
    #[must_use]
    pub fn global_state(&self) -> Option<&[u8]> {
        self.global_state.as_deref()
    }

    /// Replace the container-level state blob.
    pub fn set_global_state(&mut self, state: Option<Vec<u8>>) {
        self.global_state = state;
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notices(&mut self) -> Vec<GridNotice<V>> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the configuration. Pending moves are dropped.
    pub fn reconfigure(&mut self, config: GridConfig) {
        self.config = config;
        self.grid = config.grid(self.grid.item_count());
        self.pending.cancel();
        self.child_states.set_policy(config.child_state_policy);
        self.load_more.set_enabled(config.can_load_more);
        self.notices.push(GridNotice::LayoutRequested);
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select `position` at the next layout pass.
    pub fn set_selection(&mut self, position: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(position, "grid_view.set_selection");
        self.pending_selection = Some(position);
        self.pending.cancel();
        self.notices.push(GridNotice::LayoutRequested);
    }

    /// The selected position, including a selection not yet laid out.
    #[must_use]
    pub fn selected_position(&self) -> Option<usize> {
        self.pending_selection
            .or_else(|| self.tracker.pending_position())
    }

    /// Focus `position` and scroll it to the center of the viewport.
    ///
    /// Falls back to [`set_selection`](Self::set_selection) when the item
    /// has no attached view; returns whether the scroll was issued now.
    pub fn smooth_scroll_to_center<H>(&mut self, host: &mut H, position: usize) -> bool
    where
        H: GridHost<View = V>,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("grid_view", op = "smooth_scroll_to_center").entered();
        if !self.grid.contains(position) {
            return false;
        }
        let Some(view) = host.find_view_at(position) else {
            self.set_selection(position);
            return false;
        };
        self.pending.cancel();
        self.focus_view(host, position, view);
        self.scroll_to_center(host, view);
        true
    }

    // ─── Directional input ───────────────────────────────────────────────

    /// Handle a raw key event.
    pub fn on_key<H>(&mut self, host: &mut H, key: &KeyEvent) -> InputOutcome
    where
        H: GridHost<View = V>,
    {
        if let Some(direction) = key.nav_direction() {
            return self.on_directional_input(host, direction);
        }
        if key.is_activation()
            && let Some(position) = self.live_focus()
        {
            let selection = self.selection_at(host, Some(position));
            self.notices.push(GridNotice::ItemClicked(selection));
            return InputOutcome::Activated(position);
        }
        InputOutcome::Ignored
    }

    /// Handle a directional command.
    pub fn on_directional_input<H>(&mut self, host: &mut H, direction: NavDirection) -> InputOutcome
    where
        H: GridHost<View = V>,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("grid_view", op = "directional_input").entered();

        let Some(current) = self.live_focus() else {
            return InputOutcome::Ignored;
        };
        if !self.grid.contains(current) {
            return InputOutcome::Ignored;
        }
        let orientation = self.config.orientation;
        let logical = direction.logical(orientation, self.config.reverse_layout);
        let primary = direction.is_primary(orientation);

        let base = if primary && self.pending.pending() != 0 {
            self.pending.target().unwrap_or(current)
        } else {
            current
        };

        let Some(target) = self.grid.step(base, logical) else {
            return self.on_edge(direction, logical);
        };

        if primary {
            self.move_coalesced(host, current, logical, target)
        } else {
            if self.pending.is_active() {
                self.pending.cancel();
                host.stop_scroll();
            }
            self.move_directly(host, target)
        }
    }

    fn on_edge(&mut self, direction: NavDirection, logical: NavDirection) -> InputOutcome {
        if logical.is_forward() && logical.is_primary(self.config.orientation) {
            let action = self.load_more.request();
            if action != LoadMoreAction::Nothing {
                #[cfg(feature = "tracing")]
                tracing::debug!(?action, "grid_view.load_more");
                self.notices.push(GridNotice::LoadMore(action));
            }
        }
        if self.config.focus_exits.contains(Edges::toward(direction)) {
            InputOutcome::Exit(direction)
        } else {
            InputOutcome::Blocked(direction)
        }
    }

    fn move_directly<H>(&mut self, host: &mut H, target: usize) -> InputOutcome
    where
        H: GridHost<View = V>,
    {
        match host.find_view_at(target) {
            Some(view) => {
                self.focus_view(host, target, view);
                self.scroll_into_view(host, view);
            }
            None => {
                self.tracker.set_focus(Some(target));
                self.notices.push(GridNotice::LayoutRequested);
            }
        }
        self.push_settled(host);
        InputOutcome::Moved { target }
    }

    fn move_coalesced<H>(
        &mut self,
        host: &mut H,
        current: usize,
        logical: NavDirection,
        target: usize,
    ) -> InputOutcome
    where
        H: GridHost<View = V>,
    {
        let step = if logical.is_forward() { 1 } else { -1 };
        let outcome = self.pending.request_move(step);
        if !outcome.accepted {
            return InputOutcome::Pending {
                pending: outcome.pending,
                target: self.pending.target().unwrap_or(current),
            };
        }
        if outcome.settled {
            // Reversed back onto the focused item before it was reached.
            self.pending.cancel();
            host.stop_scroll();
            self.push_settled(host);
            if let Some(view) = host.find_view_at(current) {
                self.scroll_to_center(host, view);
            }
            return InputOutcome::Moved { target: current };
        }

        self.pending.set_target(Some(target));
        let preselected = self.selection_at(host, Some(target));
        self.notices.push(GridNotice::ItemPreSelected(preselected));

        self.advance_pending(host);
        if self.pending.pending() == 0 {
            return InputOutcome::Moved {
                target: self.live_focus().unwrap_or(target),
            };
        }
        self.keep_scrolling(host);
        InputOutcome::Pending {
            pending: self.pending.pending(),
            target,
        }
    }

    /// Walk focus towards the target while the next line is on screen.
    fn advance_pending<H>(&mut self, host: &mut H)
    where
        H: GridHost<View = V>,
    {
        while self.pending.pending() != 0 {
            let Some(current) = self.live_focus() else {
                break;
            };
            let direction = primary_direction(self.config.orientation, self.pending.pending() > 0);
            let Some(next) = self.grid.step(current, direction) else {
                break;
            };
            let Some(view) = host.find_view_at(next) else {
                break;
            };
            if !is_revealed(&*host, view) {
                break;
            }
            self.pending.consume_one();
            self.focus_view(host, next, view);
            if self.pending.pending() == 0 {
                // Gesture complete; nothing left to correct on stop.
                self.pending.set_target(None);
                self.push_settled(host);
                self.scroll_to_center(host, view);
            }
        }
    }

    fn keep_scrolling<H>(&mut self, host: &mut H)
    where
        H: GridHost<View = V>,
    {
        let orientation = self.config.orientation;
        let Some(vector) = self.pending.scroll_vector(orientation, self.config.reverse_layout)
        else {
            return;
        };
        let extent = self
            .live_focus()
            .and_then(|p| host.find_view_at(p))
            .and_then(|view| host.bounds(view))
            .map_or(1, |bounds| match orientation {
                Orientation::Vertical => bounds.height,
                Orientation::Horizontal => bounds.width,
            })
            .max(1);
        let (dx, dy) = vector.scaled(extent.saturating_mul(self.config.scroll_step));
        host.smooth_scroll_by(dx, dy);
    }

    // ─── Scrolling ───────────────────────────────────────────────────────

    /// A scroll animation frame ran.
    pub fn on_scroll_tick<H>(&mut self, host: &mut H)
    where
        H: GridHost<View = V>,
    {
        if self.pending.pending() != 0 {
            self.advance_pending(host);
        }
    }

    /// The scroll phase changed.
    pub fn on_scroll_state_changed<H>(&mut self, host: &mut H, state: ScrollState)
    where
        H: GridHost<View = V>,
    {
        if state != ScrollState::Idle {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("grid_view", op = "scroll_idle").entered();

        if self.pending.is_active() {
            self.advance_pending(host);
            let stop = self.pending.on_stop();
            let mut settle = stop.settled;
            let corrective = stop
                .corrective_target
                .filter(|&t| self.grid.contains(t))
                .and_then(|t| host.find_view_at(t).map(|view| (t, view)))
                .filter(|&(_, view)| is_revealed(&*host, view));
            match corrective {
                Some((target, view)) => {
                    if self.live_focus() != Some(target) {
                        self.focus_view(host, target, view);
                        settle = true;
                    }
                    self.scroll_to_center(host, view);
                }
                None => {
                    if let Some(view) = self.live_focus().and_then(|p| host.find_view_at(p)) {
                        self.scroll_to_center(host, view);
                    }
                }
            }
            if settle {
                self.push_settled(host);
            }
        }

        if let Some(position) = self.live_focus() {
            let target = focus_target(host, position);
            self.memory.archive(Some(target));
        }
    }

    fn scroll_into_view<H>(&mut self, host: &mut H, view: V) -> bool
    where
        H: GridHost<View = V>,
    {
        match host.bounds(view) {
            Some(bounds) if host.viewport().contains_rect(&bounds) => false,
            _ => self.scroll_to_center(host, view),
        }
    }

    fn scroll_to_center<H>(&mut self, host: &mut H, view: V) -> bool
    where
        H: GridHost<View = V>,
    {
        let Some(bounds) = host.bounds(view) else {
            return false;
        };
        let orientation = self.config.orientation;
        let delta = bounds.center_delta(&host.viewport(), orientation);
        if delta == 0 {
            return false;
        }
        let (dx, dy) = orientation.axis_vector(delta);
        host.smooth_scroll_by(dx, dy);
        true
    }

    // ─── Focus ───────────────────────────────────────────────────────────

    /// A child view received input focus.
    pub fn on_child_focus_gained<H>(&mut self, host: &mut H, position: usize)
    where
        H: GridHost<View = V>,
    {
        self.memory.archive(Some(focus_target(host, position)));
        if self.live_focus() == Some(position) {
            return;
        }
        self.tracker.set_focus(Some(position));
        if self.pending.pending() == 0 {
            let selection = self.selection_at(host, Some(position));
            self.notices.push(GridNotice::ItemSelected(selection));
        }
    }

    /// A child view lost input focus.
    pub fn on_child_focus_lost<H>(&mut self, host: &mut H, position: usize)
    where
        H: GridHost<View = V>,
    {
        self.memory.archive(Some(focus_target(host, position)));
    }

    /// Focus entered the container from outside; pick the child to focus.
    ///
    /// Tries the remembered item, then a pending selection, then the tracked
    /// focus, then the first item. Returns the focused position.
    pub fn on_container_focus_gained<H>(&mut self, host: &mut H) -> Option<usize>
    where
        H: GridHost<View = V>,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("grid_view", op = "container_focus").entered();

        let view = self
            .memory
            .resolve(&*host, host.has_stable_ids())
            .or_else(|| self.pending_selection.and_then(|p| host.find_view_at(p)))
            .or_else(|| self.live_focus().and_then(|p| host.find_view_at(p)))
            .or_else(|| host.find_view_at(0))?;
        let position = host.position_of(view)?;
        self.focus_view(host, position, view);
        Some(position)
    }

    fn focus_view<H>(&mut self, host: &mut H, position: usize, view: V)
    where
        H: GridHost<View = V>,
    {
        let changed = self.live_focus() != Some(position);
        self.tracker.set_focus(Some(position));
        self.memory.archive(Some(focus_target(host, position)));
        host.request_focus(view);
        if changed {
            let selection = Selection {
                view: Some(view),
                position: Some(position),
                item_id: host.id_at(position),
            };
            self.notices.push(GridNotice::ItemSelected(selection));
        }
    }

    fn push_settled<H>(&mut self, host: &H)
    where
        H: GridHost<View = V>,
    {
        let selection = self.selection_at(host, self.live_focus());
        #[cfg(feature = "tracing")]
        tracing::debug!(position = ?selection.position, "grid_view.selection_settled");
        self.notices.push(GridNotice::SelectionSettled(selection));
    }

    /// Focus position with mutations since the last layout applied.
    fn live_focus(&self) -> Option<usize> {
        self.tracker.pending_position()
    }

    fn selection_at<H>(&self, host: &H, position: Option<usize>) -> Selection<V>
    where
        H: GridHost<View = V>,
    {
        match position {
            Some(p) => Selection {
                view: host.find_view_at(p),
                position: Some(p),
                item_id: host.id_at(p),
            },
            None => Selection::none(),
        }
    }

    // ─── Data changes ────────────────────────────────────────────────────

    /// The item source reported a mutation.
    ///
    /// `host` already reflects the change. An in-flight coalesced scroll
    /// keeps running: its target follows the item, and its queued moves
    /// still settle exactly once.
    pub fn on_items_changed<H>(&mut self, host: &mut H, change: ItemChange)
    where
        H: GridHost<View = V>,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!(?change, offset = ?self.tracker.offset(), "grid_view.items_changed");

        self.tracker.apply(change);
        self.pending.apply(change);
        self.grid = self.config.grid(host.item_count());
        match change {
            ItemChange::Updated { start, count } => self.child_states.remove_range(start, count),
            _ => self.child_states.clear(),
        }
        self.notices.push(GridNotice::LayoutRequested);
    }

    /// The item source was replaced.
    pub fn on_adapter_changed<H>(&mut self, host: &mut H)
    where
        H: GridHost<View = V>,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(items = host.item_count(), "grid_view.adapter_changed");

        if self.pending.is_active() {
            host.stop_scroll();
        }
        self.tracker.reset();
        self.memory = FocusMemory::new();
        self.pending = PendingMoveCoordinator::new();
        self.child_states.clear();
        self.load_more.reset();
        self.pending_selection = None;
        self.has_laid_out = false;
        self.grid = self.config.grid(host.item_count());
        self.notices.push(GridNotice::LayoutRequested);
    }

    // ─── Layout ──────────────────────────────────────────────────────────

    /// Run the per-layout commit and bring the selection into view.
    pub fn on_layout<H>(&mut self, host: &mut H) -> LayoutOutcome
    where
        H: GridHost<View = V>,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("grid_view", op = "layout").entered();

        self.grid = self.config.grid(host.item_count());
        let count = self.grid.item_count();
        #[cfg(feature = "tracing")]
        let previous = self.tracker.focus();
        let commit = self.tracker.commit();

        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?previous, to = ?commit.position(), outcome = ?commit, "focus.commit");

        let mut fallback_applied = false;
        let mut announce = false;
        let selected = if let Some(requested) = self.pending_selection.filter(|_| count > 0) {
            self.pending_selection = None;
            announce = true;
            #[cfg(feature = "tracing")]
            tracing::debug!(requested, items = count, "grid_view.pending_selection");
            Some(requested.min(count - 1))
        } else {
            match commit {
                CommitOutcome::NoFocus => {
                    announce = !self.has_laid_out && count > 0;
                    announce.then_some(0)
                }
                CommitOutcome::Unchanged(p) | CommitOutcome::Shifted { to: p, .. } if p < count => {
                    Some(p)
                }
                CommitOutcome::Unchanged(last_known)
                | CommitOutcome::Shifted { to: last_known, .. }
                | CommitOutcome::Indeterminate { last_known } => {
                    fallback_applied = true;
                    announce = true;
                    let selected = self.config.fallback.resolve(last_known, count);
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        last_known,
                        ?selected,
                        policy = ?self.config.fallback,
                        "focused item removed, applying fallback selection"
                    );
                    self.notices.push(GridNotice::FallbackApplied {
                        last_known,
                        selected,
                    });
                    selected
                }
            }
        };

        self.tracker.set_focus(selected);
        self.has_laid_out = true;

        let mut scrolled = false;
        if let Some(position) = selected {
            let view = host.find_view_at(position);
            if let Some(view) = view {
                if host.has_focus() && host.focused_view() != Some(view) {
                    host.request_focus(view);
                }
                if self.pending.pending() == 0 {
                    scrolled = self.scroll_into_view(host, view);
                }
                self.memory.archive(Some(focus_target(host, position)));
            }
            if announce {
                self.notices.push(GridNotice::ItemSelected(Selection {
                    view,
                    position: Some(position),
                    item_id: host.id_at(position),
                }));
            }
        }

        LayoutOutcome {
            commit,
            selected,
            fallback_applied,
            scrolled,
        }
    }

    // ─── Children ────────────────────────────────────────────────────────

    /// A view was attached for `position`; hand back any retained state.
    pub fn on_child_attached<H>(&mut self, host: &mut H, view: V, position: usize)
    where
        H: GridHost<View = V>,
    {
        if let Some(state) = self.child_states.take(position) {
            host.restore_view_state(view, &state);
        }
    }

    /// A view is detaching from `position`; retain its state if the item
    /// still exists.
    pub fn on_child_detached<H>(&mut self, host: &mut H, view: V, position: usize)
    where
        H: GridHost<View = V>,
    {
        if position >= host.item_count() {
            return;
        }
        if let Some(state) = host.save_view_state(view) {
            self.child_states.save_off_screen(position, state);
        }
    }

    /// Child index to paint in slot `i`.
    #[must_use]
    pub fn draw_order<H>(&self, host: &H, child_count: usize, i: usize) -> usize
    where
        H: GridHost<View = V>,
    {
        let focused = host.focused_view().and_then(|view| host.child_index(view));
        self.config.draw_order.order(child_count, i, focused)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Serialize the selection and the state of retained and on-screen
    /// children.
    #[must_use]
    pub fn save_blob<H>(&self, host: &H) -> Vec<u8>
    where
        H: GridHost<View = V>,
    {
        let on_screen = (0..host.child_count())
            .filter_map(|i| host.child_at(i))
            .filter_map(|view| Some((host.position_of(view)?, host.save_view_state(view)?)));
        let saved = SavedSelection {
            index: self.selected_position(),
            child_states: self.child_states.snapshot_with(on_screen),
            global: self.global_state.clone(),
        };
        let versioned = VersionedState::new(<Self as Stateful>::state_version(), saved);
        match SelectionStateCodec::encode(&versioned) {
            Ok(bytes) => bytes,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "failed to encode selection state");
                Vec::new()
            }
        }
    }

    /// Restore from a blob written by [`save_blob`](Self::save_blob).
    ///
    /// Empty or malformed input restores the empty state.
    pub fn restore_blob(&mut self, blob: &[u8]) {
        let saved = match SelectionStateCodec::decode(blob, <Self as Stateful>::state_version()) {
            Ok(saved) => saved,
            Err(CodecError::Empty) => SavedSelection::default(),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "discarding malformed selection state");
                SavedSelection::default()
            }
        };
        self.apply_saved(saved);
    }

    fn snapshot(&self) -> SavedSelection {
        SavedSelection {
            index: self.selected_position(),
            child_states: self.child_states.snapshot(),
            global: self.global_state.clone(),
        }
    }

    fn apply_saved(&mut self, saved: SavedSelection) {
        self.pending.cancel();
        self.tracker.set_focus(saved.index);
        self.pending_selection = saved.index;
        self.child_states.load(saved.child_states);
        self.global_state = saved.global;
        self.notices.push(GridNotice::LayoutRequested);
    }

    // ─── Event routing ───────────────────────────────────────────────────

    /// Route one inbound event.
    pub fn handle<H>(&mut self, host: &mut H, event: GridEvent<V>) -> HandleOutcome
    where
        H: GridHost<View = V>,
    {
        match event {
            GridEvent::Key(key) => HandleOutcome::Input(self.on_key(host, &key)),
            GridEvent::Direction(direction) => {
                HandleOutcome::Input(self.on_directional_input(host, direction))
            }
            GridEvent::ChildFocusGained(position) => {
                self.on_child_focus_gained(host, position);
                HandleOutcome::Done
            }
            GridEvent::ChildFocusLost(position) => {
                self.on_child_focus_lost(host, position);
                HandleOutcome::Done
            }
            GridEvent::ContainerFocusGained => {
                HandleOutcome::Focused(self.on_container_focus_gained(host))
            }
            GridEvent::ScrollTick => {
                self.on_scroll_tick(host);
                HandleOutcome::Done
            }
            GridEvent::ScrollStateChanged(state) => {
                self.on_scroll_state_changed(host, state);
                HandleOutcome::Done
            }
            GridEvent::ItemsChanged(change) => {
                self.on_items_changed(host, change);
                HandleOutcome::Done
            }
            GridEvent::AdapterChanged => {
                self.on_adapter_changed(host);
                HandleOutcome::Done
            }
            GridEvent::Layout => HandleOutcome::Layout(self.on_layout(host)),
            GridEvent::ChildAttached { view, position } => {
                self.on_child_attached(host, view, position);
                HandleOutcome::Done
            }
            GridEvent::ChildDetached { view, position } => {
                self.on_child_detached(host, view, position);
                HandleOutcome::Done
            }
        }
    }
}

impl<V: Copy + Eq + Debug> Stateful for GridView<V> {
    type State = SavedSelection;

    fn state_key(&self) -> StateKey {
        StateKey::new("GridView", self.state_id.clone())
    }

    fn save_state(&self) -> SavedSelection {
        self.snapshot()
    }

    fn restore_state(&mut self, state: SavedSelection) {
        self.apply_saved(state);
    }
}

fn primary_direction(orientation: Orientation, forward: bool) -> NavDirection {
    match (orientation, forward) {
        (Orientation::Vertical, true) => NavDirection::Down,
        (Orientation::Vertical, false) => NavDirection::Up,
        (Orientation::Horizontal, true) => NavDirection::Right,
        (Orientation::Horizontal, false) => NavDirection::Left,
    }
}

fn is_revealed<P: ViewProvider + ?Sized>(views: &P, view: P::View) -> bool {
    views
        .bounds(view)
        .is_some_and(|bounds| bounds.intersects(&views.viewport()))
}

fn focus_target<S: ItemSource + ?Sized>(items: &S, position: usize) -> FocusTarget {
    FocusTarget::new(position, items.id_at(position))
}
