//! Integer yard geometry.
//!
//! The yard uses screen-style coordinates: `x` grows to the right, `y` grows
//! downwards, and a rectangle is anchored at its top-left corner.  An item's
//! `length` is its vertical extent and `width` its horizontal one, so
//!
//! ```text
//! (left, top, right, bottom) = (x, y, x + width, y + length)
//! ```

use std::fmt;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A top-left anchor in the yard.  Used as the grid key and as a carrier
/// target.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// The "no active target" sentinel.
    pub const IDLE: Cell = Cell { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }

    #[inline]
    pub fn as_tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle: top-left anchor plus extent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x:      i32,
    pub y:      i32,
    /// Vertical extent.
    pub length: i32,
    /// Horizontal extent.
    pub width:  i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, length: i32, width: i32) -> Self {
        Self { x, y, length, width }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.length
    }

    /// `(left, top, right, bottom)`.
    #[inline]
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.right(), self.bottom())
    }

    /// The same extent anchored at `cell`.
    #[inline]
    pub fn at(&self, cell: Cell) -> Rect {
        Rect { x: cell.x, y: cell.y, ..*self }
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// `true` when the anchor or the bottom edge has left `[0, width) × [0, height)`.
    ///
    /// The right edge is not tested; an item parked against the
    /// right border still counts as inside.
    #[inline]
    pub fn outside(&self, width: i32, height: i32) -> bool {
        self.x >= width || self.x < 0 || self.bottom() >= height || self.y < 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {} {}x{}]", self.x, self.y, self.width, self.length)
    }
}
