//! Layout error type.

use thiserror::Error;

use yard_core::{Cell, Rect};

/// Errors produced by `yard-layout`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no zone accepts row height {height}")]
    NoZone { height: i32 },

    #[error("all zone budgets are exhausted; cannot add row height {height}")]
    Saturated { height: i32 },

    #[error("row height {height} would end the layout at y={bottom}, past the yard")]
    RowOutOfYard { height: i32, bottom: i32 },

    #[error("row height {height} would move occupied row {row} at y={y}")]
    RowOccupied { height: i32, row: i32, y: i32 },

    #[error("row at y={y} has no room left for {label}")]
    RowFull { y: i32, label: String },

    #[error("{label} is {length} long; rows hold at most {max}")]
    Oversized { label: String, length: i32, max: i32 },

    #[error("{label} at {rect} does not fit across the yard")]
    OutOfYard { label: String, rect: Rect },

    #[error("cell {cell} is already occupied by {occupant}")]
    CellOccupied { cell: Cell, occupant: String },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
