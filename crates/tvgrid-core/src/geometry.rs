#![forbid(unsafe_code)]

//! Grid geometry: rectangles, orientation, and edge classification.
//!
//! A [`Grid`] lays `item_count` items into `span_count` parallel tracks.
//! In a vertical grid the tracks are columns and lines are rows; in a
//! horizontal grid the tracks are rows and lines are columns.
//!
//! # Invariants
//!
//! 1. `span_count >= 1` (clamped on construction).
//! 2. Every predicate is pure and total: an out-of-range position or an
//!    empty grid answers `false` / `None`, never panics.
//! 3. `line_count()` rounds up, so a partially filled last line is the last
//!    line for every edge predicate.

use bitflags::bitflags;

use crate::event::NavDirection;

/// An axis-aligned rectangle in container pixel coordinates.
///
/// Origin is top-left; `x`/`y` may be negative for items scrolled partially
/// out of the viewport. A non-positive `width` or `height` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (inclusive).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Horizontal center (rounded towards the left edge).
    #[inline]
    pub const fn center_x(&self) -> i32 {
        self.x.saturating_add(self.width / 2)
    }

    /// Vertical center (rounded towards the top edge).
    #[inline]
    pub const fn center_y(&self) -> i32 {
        self.y.saturating_add(self.height / 2)
    }

    /// Center coordinate along the scrolling axis of `orientation`.
    #[inline]
    pub const fn primary_center(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.center_y(),
            Orientation::Horizontal => self.center_x(),
        }
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rectangles overlap by at least one pixel.
    #[inline]
    pub const fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Scroll distance along the primary axis that would bring this
    /// rectangle's center onto the center of `viewport`.
    ///
    /// Positive means "scroll forward" (content moves up / left).
    #[inline]
    pub const fn center_delta(&self, viewport: &Rect, orientation: Orientation) -> i32 {
        self.primary_center(orientation)
            .saturating_sub(viewport.primary_center(orientation))
    }
}

/// Scrolling axis of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Lines are columns; scrolls left/right.
    Horizontal,
    /// Lines are rows; scrolls up/down.
    #[default]
    Vertical,
}

impl Orientation {
    /// Split a primary-axis distance into an `(dx, dy)` pair.
    #[inline]
    #[must_use]
    pub const fn axis_vector(self, distance: i32) -> (i32, i32) {
        match self {
            Self::Horizontal => (distance, 0),
            Self::Vertical => (0, distance),
        }
    }
}

bitflags! {
    /// A set of grid edges.
    ///
    /// Used both as the result of edge classification and as the set of
    /// edges focus is allowed to leave the container through.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Leftmost column.
        const LEFT   = 0b0001;
        /// Rightmost column.
        const RIGHT  = 0b0010;
        /// Topmost row.
        const TOP    = 0b0100;
        /// Bottommost row.
        const BOTTOM = 0b1000;
    }
}

impl Edges {
    /// The edge a move in `direction` runs into.
    #[inline]
    #[must_use]
    pub const fn toward(direction: NavDirection) -> Self {
        match direction {
            NavDirection::Up => Self::TOP,
            NavDirection::Down => Self::BOTTOM,
            NavDirection::Left => Self::LEFT,
            NavDirection::Right => Self::RIGHT,
        }
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::all()
    }
}

/// Item arrangement for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    item_count: usize,
    span_count: usize,
    orientation: Orientation,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 1, Orientation::Vertical)
    }
}

impl Grid {
    /// Create a grid. `span_count` is clamped to at least 1.
    #[must_use]
    pub const fn new(item_count: usize, span_count: usize, orientation: Orientation) -> Self {
        Self {
            item_count,
            span_count: if span_count == 0 { 1 } else { span_count },
            orientation,
        }
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of parallel tracks.
    #[inline]
    #[must_use]
    pub const fn span_count(&self) -> usize {
        self.span_count
    }

    /// Scrolling axis.
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the grid has no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Whether `position` names an item.
    #[inline]
    #[must_use]
    pub const fn contains(&self, position: usize) -> bool {
        position < self.item_count
    }

    /// Number of lines along the primary axis, counting a partial last line.
    #[inline]
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.item_count.div_ceil(self.span_count)
    }

    /// Line (row if vertical, column if horizontal) holding `position`.
    #[inline]
    #[must_use]
    pub const fn line_of(&self, position: usize) -> Option<usize> {
        if self.contains(position) {
            Some(position / self.span_count)
        } else {
            None
        }
    }

    /// `(row, column)` of `position`.
    #[must_use]
    pub const fn cell(&self, position: usize) -> Option<(usize, usize)> {
        if !self.contains(position) {
            return None;
        }
        let line = position / self.span_count;
        let track = position % self.span_count;
        Some(match self.orientation {
            Orientation::Vertical => (line, track),
            Orientation::Horizontal => (track, line),
        })
    }

    // --- Edge predicates -------------------------------------------------

    #[inline]
    const fn is_first_track(&self, position: usize) -> bool {
        position % self.span_count == 0
    }

    #[inline]
    const fn is_last_track(&self, position: usize) -> bool {
        position % self.span_count == self.span_count - 1 || position + 1 == self.item_count
    }

    #[inline]
    const fn is_first_line(&self, position: usize) -> bool {
        position < self.span_count
    }

    #[inline]
    const fn is_last_line(&self, position: usize) -> bool {
        position / self.span_count + 1 == self.line_count()
    }

    /// Whether `position` is in the leftmost column.
    #[must_use]
    pub const fn is_leftmost_column(&self, position: usize) -> bool {
        if !self.contains(position) {
            return false;
        }
        match self.orientation {
            Orientation::Horizontal => self.is_first_line(position),
            Orientation::Vertical => self.is_first_track(position),
        }
    }

    /// Whether `position` is in the rightmost column.
    #[must_use]
    pub const fn is_rightmost_column(&self, position: usize) -> bool {
        if !self.contains(position) {
            return false;
        }
        match self.orientation {
            Orientation::Horizontal => self.is_last_line(position),
            Orientation::Vertical => self.is_last_track(position),
        }
    }

    /// Whether `position` is in the topmost row.
    #[must_use]
    pub const fn is_topmost_row(&self, position: usize) -> bool {
        if !self.contains(position) {
            return false;
        }
        match self.orientation {
            Orientation::Horizontal => self.is_first_track(position),
            Orientation::Vertical => self.is_first_line(position),
        }
    }

    /// Whether `position` is in the bottommost row.
    #[must_use]
    pub const fn is_bottommost_row(&self, position: usize) -> bool {
        if !self.contains(position) {
            return false;
        }
        match self.orientation {
            Orientation::Horizontal => self.is_last_track(position),
            Orientation::Vertical => self.is_last_line(position),
        }
    }

    /// All edges `position` touches. Empty for interior or invalid positions.
    #[must_use]
    pub fn edges(&self, position: usize) -> Edges {
        let mut edges = Edges::empty();
        if self.is_leftmost_column(position) {
            edges |= Edges::LEFT;
        }
        if self.is_rightmost_column(position) {
            edges |= Edges::RIGHT;
        }
        if self.is_topmost_row(position) {
            edges |= Edges::TOP;
        }
        if self.is_bottommost_row(position) {
            edges |= Edges::BOTTOM;
        }
        edges
    }

    /// Whether a move from `position` in `direction` runs into an edge.
    #[must_use]
    pub fn is_at_edge(&self, position: usize, direction: NavDirection) -> bool {
        self.edges(position).contains(Edges::toward(direction))
    }

    /// Neighbor of `position` in `direction`, in logical (unreversed) space.
    ///
    /// A primary-axis forward move into a partially filled last line lands
    /// on the last item. Returns `None` at an edge or for invalid positions.
    #[must_use]
    pub fn step(&self, position: usize, direction: NavDirection) -> Option<usize> {
        if !self.contains(position) || self.is_at_edge(position, direction) {
            return None;
        }
        let span = self.span_count;
        let target = if direction.is_primary(self.orientation) {
            if direction.is_forward() {
                (position + span).min(self.item_count - 1)
            } else {
                position - span
            }
        } else if direction.is_forward() {
            position + 1
        } else {
            position - 1
        };
        Some(target)
    }
}
