//! Carrier actions, stride selection, and movement clamping.

use std::fmt;

use yard_core::{Cell, Rect};

// ── Action ────────────────────────────────────────────────────────────────────

/// A movement command.  Wire ids are `0..=3`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Action {
    Up    = 0,
    Down  = 1,
    Left  = 2,
    Right = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, u8> {
        Action::ALL.get(usize::from(id)).copied().ok_or(id)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Up    => "up",
            Action::Down  => "down",
            Action::Left  => "left",
            Action::Right => "right",
        })
    }
}

// ── Stride ────────────────────────────────────────────────────────────────────

/// Per-axis step lengths for the next move.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Stride {
    pub x: i32,
    pub y: i32,
}

/// Largest stride on either axis.
pub const MAX_STRIDE: i32 = 10;

/// Choose strides from the remaining distance to `target`.
///
/// Far from the target the carrier takes [`MAX_STRIDE`] steps; within a
/// quarter of the yard extent it halves the remaining distance; within a
/// sixteenth it moves one unit at a time.  The y axis is measured against
/// `height`, which includes a bottom road when one is enabled.
pub fn binary_forward(from: Cell, target: Cell, width: i32, height: i32) -> Stride {
    Stride {
        x: axis_stride((target.x - from.x).abs(), width),
        y: axis_stride((target.y - from.y).abs(), height),
    }
}

fn axis_stride(distance: i32, extent: i32) -> i32 {
    let d = f64::from(distance);
    let e = f64::from(extent);
    let stride = if d > e / 2.0 || (e / 4.0 < d && d < e / 2.0) {
        MAX_STRIDE
    } else if (e / 8.0 < d && d < e / 4.0) || (e / 16.0 < d && d < e / 8.0) {
        distance / 2
    } else {
        1
    };
    // Never step past the target on small yards.
    stride.min(distance).max(1)
}

/// Apply `action` to the carrier footprint `rect`, clamped to the yard.
///
/// Moving down clamps the bottom edge to `height`.
pub fn apply_move(rect: &Rect, action: Action, stride: Stride, width: i32, height: i32) -> Cell {
    let Cell { x, y } = rect.cell();
    match action {
        Action::Up => Cell::new(x, (y - stride.y).max(0)),
        Action::Down => {
            let y = (y + stride.y).min(height);
            Cell::new(x, y.min(height - rect.length))
        }
        Action::Left  => Cell::new((x - stride.x).max(0), y),
        Action::Right => Cell::new((x + stride.x).min(width), y),
    }
}
