//! `yard-layout` — row layout and occupancy for the yard.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`partition`] | `SegmentPartition`, `Zone`, `RowSlot`                      |
//! | [`grid`]      | `YardGrid` — cell → resident map, collisions, sweeps       |
//! | [`error`]     | `LayoutError`, `LayoutResult<T>`                           |
//!
//! # Row model
//!
//! Rows are identified by their height.  The partition keeps three
//! capacity-limited zones (high, mid, low), each a descending list of
//! heights.  The combined list `high ++ mid ++ low` with cumulative
//! y-offsets is the yard's row layout:
//!
//! ```text
//! rows    = [20, 17, 14, 11]     high = [20, 17], mid = [14], low = [11]
//! offsets = [20, 40, 92, 150]    top + bottom roads: mid/low restart at 92/150
//! ```
//!
//! An item of length `L` lives in the smallest registered row whose height
//! is within `L ..= L + 4`; inside a row items are packed left to right with
//! a one-unit gap.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `fx-hash` | Uses `rustc_hash::FxHashMap` for the grid.          |

pub mod error;
pub mod grid;
pub mod partition;


pub use error::{LayoutError, LayoutResult};
pub use grid::{collides, YardGrid};
pub use partition::{RowSlot, SegmentPartition, Zone};
