#![forbid(unsafe_code)]

//! Persistence contract for components that survive teardown.
//!
//! A component implementing [`Stateful`] can hand out a plain state value and
//! later accept one back. [`VersionedState`] wraps that value with a schema
//! version so stale blobs from an older build are detected rather than
//! misread.
//!
//! # Design Invariants
//!
//! 1. **Round-trip fidelity**: `restore_state(save_state())` reproduces the
//!    user-facing state (selected position, retained child state).
//! 2. **Graceful version mismatch**: a mismatched version yields
//!    `State::default()`, never a panic.
//! 3. **No side effects**: `save_state` is a pure read.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Version mismatch | Schema changed | `Default::default()` |
//! | Missing state | First run | `Default::default()` |

use core::fmt;

/// Identifies one component's persisted state.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StateKey {
    /// Component type name (e.g. `"GridView"`).
    pub component: &'static str,
    /// Instance-unique id within the application.
    pub instance_id: String,
}

impl StateKey {
    /// Create a key.
    #[must_use]
    pub fn new(component: &'static str, id: impl Into<String>) -> Self {
        Self {
            component,
            instance_id: id.into(),
        }
    }

    /// Canonical string form: `"component::instance_id"`.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.component, self.instance_id)
    }
}

/// A component whose state can be saved and restored.
pub trait Stateful: Sized {
    /// The persisted state. `Default` is the "no prior state" value.
    type State: Default;

    /// Key identifying this instance.
    fn state_key(&self) -> StateKey;

    /// Extract current state. Must be a pure read.
    fn save_state(&self) -> Self::State;

    /// Restore state, clamping anything that no longer fits.
    fn restore_state(&mut self, state: Self::State);

    /// Schema version of [`State`](Self::State). Bump on incompatible changes.
    fn state_version() -> u32 {
        1
    }
}

/// Version-tagged state envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedState<S> {
    /// Schema version (from [`Stateful::state_version`]).
    pub version: u32,
    /// The state payload.
    pub data: S,
}

impl<S> VersionedState<S> {
    /// Wrap state with a version tag.
    #[must_use]
    pub fn new(version: u32, data: S) -> Self {
        Self { version, data }
    }

    /// Pack a component's current state.
    pub fn pack<W: Stateful<State = S>>(component: &W) -> Self {
        Self {
            version: W::state_version(),
            data: component.save_state(),
        }
    }

    /// The payload, if the version matches `W`'s current version.
    pub fn unpack<W: Stateful<State = S>>(self) -> Option<S> {
        (self.version == W::state_version()).then_some(self.data)
    }

    /// The payload, or `S::default()` on version mismatch.
    pub fn unpack_or_default<W: Stateful<State = S>>(self) -> S
    where
        S: Default,
    {
        self.unpack::<W>().unwrap_or_default()
    }
}
