#![forbid(unsafe_code)]

//! tvgrid public facade crate.
//!
//! Focus, selection and scroll coordination for D-pad driven grids and
//! lists. This crate re-exports the common types from the internal crates
//! and offers a prelude for hosts embedding a [`GridView`].

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tvgrid_core::event::{ItemChange, KeyCode, KeyEvent, KeyEventKind, Modifiers, NavDirection};
pub use tvgrid_core::geometry::{Edges, Grid, Orientation, Rect};

// --- Engine re-exports -----------------------------------------------------

pub use tvgrid_widgets::{
    ChildStates, CodecError, CommitOutcome, DrawOrderPolicy, FallbackPolicy, FocusMemory,
    FocusOffset, FocusPositionTracker, FocusTarget, GridConfig, GridEvent, GridHost, GridNotice,
    GridView, HandleOutcome, InputOutcome, ItemId, ItemSource, LayoutOutcome, LoadMoreAction,
    LoadMoreController, LoadState, MAX_PENDING_MOVES, PendingMoveCoordinator, SavePolicy,
    SavedSelection, ScrollDriver, ScrollState, Selection, SelectionStateCodec, StateKey, Stateful,
    VersionedState, ViewProvider,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tvgrid hosts.
#[derive(Debug)]
pub enum Error {
    /// A persisted selection blob could not be decoded.
    State(CodecError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(err) => write!(f, "selection state: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::State(err) => Some(err),
        }
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Self::State(err)
    }
}

/// Standard result type for tvgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Decode a blob written by [`GridView::save_blob`], surfacing failures
/// instead of degrading to the empty state.
pub fn decode_selection(bytes: &[u8]) -> Result<SavedSelection> {
    let version = <GridView<()> as Stateful>::state_version();
    Ok(SelectionStateCodec::decode(bytes, version)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Edges, Error, GridConfig, GridEvent, GridHost, GridNotice, GridView, InputOutcome,
        ItemChange, ItemSource, KeyCode, KeyEvent, NavDirection, Orientation, Rect, Result,
        ScrollDriver, ScrollState, ViewProvider,
    };

    pub use crate::{core, widgets};
}

pub use tvgrid_core as core;
pub use tvgrid_widgets as widgets;
