#![forbid(unsafe_code)]

//! Core: grid geometry, directional input, and item-change events.

pub mod event;
pub mod geometry;

pub use event::{ItemChange, KeyCode, KeyEvent, KeyEventKind, Modifiers, NavDirection};
pub use geometry::{Edges, Grid, Orientation, Rect};
