#![forbid(unsafe_code)]

//! Focus, selection, and scroll coordination for tvgrid containers.

pub mod child_states;
pub mod config;
pub mod draw_order;
pub mod focus_memory;
pub mod focus_tracker;
pub mod grid_view;
pub mod host;
pub mod load_more;
pub mod pending_move;
pub mod selection_state;
pub mod stateful;

pub use child_states::{ChildStates, SavePolicy};
pub use config::{FallbackPolicy, GridConfig};
pub use draw_order::DrawOrderPolicy;
pub use focus_memory::{FocusMemory, FocusTarget};
pub use focus_tracker::{CommitOutcome, FocusOffset, FocusPositionTracker, shift_position};
pub use grid_view::{
    GridEvent, GridNotice, GridView, HandleOutcome, InputOutcome, LayoutOutcome, Selection,
};
pub use host::{GridHost, ItemId, ItemSource, ScrollDriver, ScrollState, ViewProvider};
pub use load_more::{LoadMoreAction, LoadMoreController, LoadState};
pub use pending_move::{
    MAX_PENDING_MOVES, MoveOutcome, PendingMoveCoordinator, ScrollVector, StopOutcome,
};
pub use selection_state::{CodecError, SavedSelection, SelectionStateCodec};
pub use stateful::{StateKey, Stateful, VersionedState};
