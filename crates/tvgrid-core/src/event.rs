#![forbid(unsafe_code)]

//! Directional input and item-change events.
//!
//! The grid engine consumes two kinds of inbound events:
//!
//! - **Directional commands** ([`NavDirection`]), optionally carried by a raw
//!   [`KeyEvent`] from a remote control or keyboard.
//! - **Structural mutations** ([`ItemChange`]) delivered by the item source
//!   whenever the underlying data set changes.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the input device does not report it.
//! - Held keys arrive as `Repeat` events and navigate exactly like presses;
//!   coalescing them is the job of the pending-move coordinator.
//! - `Release` events never navigate.

use bitflags::bitflags;

use crate::geometry::Orientation;

/// A directional navigation command (D-pad or arrow keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    /// Move towards the top edge.
    Up,
    /// Move towards the bottom edge.
    Down,
    /// Move towards the left edge.
    Left,
    /// Move towards the right edge.
    Right,
}

impl NavDirection {
    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether this direction runs along the scrolling axis of `orientation`.
    #[must_use]
    pub const fn is_primary(self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Vertical => matches!(self, Self::Up | Self::Down),
            Orientation::Horizontal => matches!(self, Self::Left | Self::Right),
        }
    }

    /// Whether this direction points towards increasing item positions when
    /// the layout is not reversed.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Down | Self::Right)
    }

    /// Map a visual direction into the logical (unreversed) item space.
    ///
    /// A reversed layout mirrors the primary axis only: in a reversed vertical
    /// grid, pressing `Down` walks towards lower positions.
    #[must_use]
    pub const fn logical(self, orientation: Orientation, reverse_layout: bool) -> Self {
        if reverse_layout && self.is_primary(orientation) {
            self.opposite()
        } else {
            self
        }
    }

    /// Map a key code to a direction, if it is an arrow key.
    #[must_use]
    pub const fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }
}

/// A raw key event from a remote control or keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// The navigation direction carried by this event.
    ///
    /// Returns `None` for releases, for non-arrow keys, and when Ctrl, Alt or
    /// Super is held (those chords belong to the host application).
    #[must_use]
    pub fn nav_direction(&self) -> Option<NavDirection> {
        if self.kind == KeyEventKind::Release {
            return None;
        }
        if self
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER)
        {
            return None;
        }
        NavDirection::from_key_code(self.code)
    }

    /// Whether this event activates (clicks) the focused item.
    #[must_use]
    pub fn is_activation(&self) -> bool {
        self.kind == KeyEventKind::Press && matches!(self.code, KeyCode::Enter | KeyCode::Select)
    }

    /// Convert a crossterm key event, dropping keys a grid never handles.
    #[cfg(feature = "crossterm")]
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::KeyEvent) -> Option<Self> {
        map_key_event(event)
    }
}

/// Key codes a grid reacts to: the four directions and activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Enter/Return key.
    Enter,

    /// D-pad center / select button.
    Select,

    /// Up arrow / D-pad up.
    Up,

    /// Down arrow / D-pad down.
    Down,

    /// Left arrow / D-pad left.
    Left,

    /// Right arrow / D-pad right.
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A structural mutation of the item source.
///
/// Positions are expressed in the coordinates of the data set *before* the
/// mutation, except `Moved::to`, which is the first index the moved block
/// occupies afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemChange {
    /// `count` items were inserted starting at `start`.
    Inserted { start: usize, count: usize },
    /// `count` items were removed starting at `start`.
    Removed { start: usize, count: usize },
    /// A block of `count` items moved from `from` so that it now starts at `to`.
    Moved { from: usize, to: usize, count: usize },
    /// `count` items starting at `start` changed content but not position.
    Updated { start: usize, count: usize },
    /// The whole data set changed; no positional information is available.
    DataSetChanged,
}

impl ItemChange {
    /// Whether this change can shift item positions.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Updated { .. })
    }

    /// Whether the change touches no items at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match *self {
            Self::Inserted { count, .. }
            | Self::Removed { count, .. }
            | Self::Updated { count, .. } => count == 0,
            Self::Moved { from, to, count } => count == 0 || from == to,
            Self::DataSetChanged => false,
        }
    }
}

#[cfg(feature = "crossterm")]
use crossterm::event as cte;

#[cfg(feature = "crossterm")]
fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(event.modifiers),
        kind: map_key_kind(event.kind),
    })
}

#[cfg(feature = "crossterm")]
fn map_key_kind(kind: cte::KeyEventKind) -> KeyEventKind {
    match kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    }
}

#[cfg(feature = "crossterm")]
fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    match code {
        cte::KeyCode::Enter => Some(KeyCode::Enter),
        cte::KeyCode::Left => Some(KeyCode::Left),
        cte::KeyCode::Right => Some(KeyCode::Right),
        cte::KeyCode::Up => Some(KeyCode::Up),
        cte::KeyCode::Down => Some(KeyCode::Down),
        _ => None,
    }
}

#[cfg(feature = "crossterm")]
fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.contains(cte::KeyModifiers::SUPER)
        || modifiers.contains(cte::KeyModifiers::HYPER)
        || modifiers.contains(cte::KeyModifiers::META)
    {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(
            KeyEvent::new(KeyCode::Up).nav_direction(),
            Some(NavDirection::Up)
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Down).nav_direction(),
            Some(NavDirection::Down)
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Left).nav_direction(),
            Some(NavDirection::Left)
        );
        assert_eq!(
            KeyEvent::new(KeyCode::Right).nav_direction(),
            Some(NavDirection::Right)
        );
    }

    #[test]
    fn repeat_navigates_release_does_not() {
        let held = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Repeat);
        assert_eq!(held.nav_direction(), Some(NavDirection::Down));

        let released = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Release);
        assert_eq!(released.nav_direction(), None);
    }

    #[test]
    fn chords_are_left_to_the_host() {
        let ctrl = KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::CTRL);
        assert_eq!(ctrl.nav_direction(), None);

        let shift = KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::SHIFT);
        assert_eq!(shift.nav_direction(), Some(NavDirection::Left));
    }

    #[test]
    fn non_arrow_keys_do_not_navigate() {
        assert_eq!(KeyEvent::new(KeyCode::Enter).nav_direction(), None);
        assert_eq!(KeyEvent::new(KeyCode::Select).nav_direction(), None);
    }

    #[test]
    fn activation_keys() {
        assert!(KeyEvent::new(KeyCode::Enter).is_activation());
        assert!(KeyEvent::new(KeyCode::Select).is_activation());
        assert!(!KeyEvent::new(KeyCode::Up).is_activation());
        assert!(
            !KeyEvent::new(KeyCode::Select)
                .with_kind(KeyEventKind::Repeat)
                .is_activation()
        );
        assert!(
            !KeyEvent::new(KeyCode::Enter)
                .with_kind(KeyEventKind::Release)
                .is_activation()
        );
    }

    #[test]
    fn primary_axis_follows_orientation() {
        assert!(NavDirection::Down.is_primary(Orientation::Vertical));
        assert!(!NavDirection::Left.is_primary(Orientation::Vertical));
        assert!(NavDirection::Left.is_primary(Orientation::Horizontal));
        assert!(!NavDirection::Up.is_primary(Orientation::Horizontal));
    }

    #[test]
    fn reverse_layout_mirrors_primary_axis_only() {
        let v = Orientation::Vertical;
        assert_eq!(NavDirection::Down.logical(v, true), NavDirection::Up);
        assert_eq!(NavDirection::Left.logical(v, true), NavDirection::Left);
        assert_eq!(NavDirection::Down.logical(v, false), NavDirection::Down);

        let h = Orientation::Horizontal;
        assert_eq!(NavDirection::Right.logical(h, true), NavDirection::Left);
        assert_eq!(NavDirection::Up.logical(h, true), NavDirection::Up);
    }

    #[test]
    fn opposite_is_involution() {
        for dir in [
            NavDirection::Up,
            NavDirection::Down,
            NavDirection::Left,
            NavDirection::Right,
        ] {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn item_change_classification() {
        assert!(ItemChange::Inserted { start: 0, count: 1 }.is_structural());
        assert!(!ItemChange::Updated { start: 0, count: 1 }.is_structural());
        assert!(ItemChange::DataSetChanged.is_structural());

        assert!(ItemChange::Removed { start: 3, count: 0 }.is_empty());
        assert!(
            ItemChange::Moved {
                from: 2,
                to: 2,
                count: 3
            }
            .is_empty()
        );
        assert!(!ItemChange::DataSetChanged.is_empty());
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert_eq!(KeyEventKind::default(), KeyEventKind::Press);
    }

    #[cfg(feature = "crossterm")]
    mod crossterm_mapping {
        use super::super::*;
        use crossterm::event as ct_event;

        #[test]
        fn maps_arrow_press() {
            let ct = ct_event::KeyEvent::new(ct_event::KeyCode::Down, ct_event::KeyModifiers::NONE);
            let mapped = KeyEvent::from_crossterm(ct).expect("arrow keys map");
            assert_eq!(mapped.code, KeyCode::Down);
            assert_eq!(mapped.kind, KeyEventKind::Press);
            assert_eq!(mapped.nav_direction(), Some(NavDirection::Down));
        }

        #[test]
        fn maps_modifiers_and_kind() {
            let ct = ct_event::KeyEvent::new_with_kind(
                ct_event::KeyCode::Left,
                ct_event::KeyModifiers::CONTROL | ct_event::KeyModifiers::SHIFT,
                ct_event::KeyEventKind::Repeat,
            );
            let mapped = KeyEvent::from_crossterm(ct).expect("arrow keys map");
            assert!(mapped.modifiers.contains(Modifiers::CTRL));
            assert!(mapped.modifiers.contains(Modifiers::SHIFT));
            assert_eq!(mapped.kind, KeyEventKind::Repeat);
        }

        #[test]
        fn drops_unrelated_keys() {
            for code in [
                ct_event::KeyCode::F(5),
                ct_event::KeyCode::Char('x'),
                ct_event::KeyCode::Esc,
                ct_event::KeyCode::PageDown,
            ] {
                let ct = ct_event::KeyEvent::new(code, ct_event::KeyModifiers::NONE);
                assert!(KeyEvent::from_crossterm(ct).is_none(), "{code:?}");
            }
        }
    }
}
