#![forbid(unsafe_code)]

//! Remembers the last focused item so focus can return to it.
//!
//! The item is remembered twice: by stable id and by position. Ids survive
//! reordering and insertion; positions are the nearest-neighbor fallback when
//! the id is gone or ids are not stable.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Id lookup misses | Item removed, or view not attached | Position lookup |
//! | Position lookup misses | View scrolled away | `None`; caller picks a default |

use crate::host::{ItemId, ViewProvider};

/// An item that held focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusTarget {
    /// Adapter position at the time focus was archived.
    pub position: usize,
    /// Stable id, when the item source provides one.
    pub item_id: Option<ItemId>,
}

impl FocusTarget {
    /// Create a target.
    #[must_use]
    pub const fn new(position: usize, item_id: Option<ItemId>) -> Self {
        Self { position, item_id }
    }
}

/// Last-focused-item memory for one data set.
#[derive(Debug, Clone, Default)]
pub struct FocusMemory {
    remembered: Option<FocusTarget>,
}

impl FocusMemory {
    /// Create an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the focused item. `None` keeps what was remembered before.
    pub fn archive(&mut self, focused: Option<FocusTarget>) {
        if let Some(target) = focused {
            self.remembered = Some(target);
        }
    }

    /// The remembered item, if any.
    #[inline]
    #[must_use]
    pub fn remembered(&self) -> Option<FocusTarget> {
        self.remembered
    }

    /// Forget the remembered item.
    pub fn clear(&mut self) {
        self.remembered = None;
    }

    /// Find the live view to refocus: by id first when ids are stable, then
    /// by position.
    pub fn resolve<P>(&self, views: &P, has_stable_ids: bool) -> Option<P::View>
    where
        P: ViewProvider + ?Sized,
    {
        let target = self.remembered?;
        if has_stable_ids
            && let Some(id) = target.item_id
            && let Some(view) = views.find_view_by_id(id)
        {
            return Some(view);
        }
        views.find_view_at(target.position)
    }
}
