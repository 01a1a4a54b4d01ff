#![forbid(unsafe_code)]

//! Child paint order that keeps the focused child on top.
//!
//! The container asks, for each paint slot `i`, which child to draw there.
//! Both policies are permutations of `0..child_count` and degrade to the
//! identity when nothing (or an out-of-range index) is focused.

/// How the focused child is lifted above its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawOrderPolicy {
    /// Children before the focus draw in natural order, children after it
    /// draw in reverse, and the focused child draws last. Neighbors on both
    /// sides overlap outward from the focus.
    #[default]
    FanOut,
    /// The focused child and the last child trade slots; everything else
    /// keeps its natural order.
    SwapToFront,
}

impl DrawOrderPolicy {
    /// Child index to draw in paint slot `i`.
    #[must_use]
    pub const fn order(self, child_count: usize, i: usize, focused: Option<usize>) -> usize {
        let f = match focused {
            Some(f) if f < child_count && i < child_count => f,
            _ => return i,
        };
        let last = child_count - 1;
        match self {
            Self::FanOut => {
                if i < f {
                    i
                } else if i < last {
                    f + last - i
                } else {
                    f
                }
            }
            Self::SwapToFront => {
                if i == last {
                    f
                } else if i == f {
                    last
                } else {
                    i
                }
            }
        }
    }
}
