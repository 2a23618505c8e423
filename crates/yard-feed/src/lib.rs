//! `yard-feed` — the item arrival feed.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`record`]  | `ArrivalRecord` — one validated feed row              |
//! | [`loader`]  | `load_arrivals_csv`, `load_arrivals_reader`           |
//! | [`error`]   | `FeedError`, `FeedResult<T>`                          |
//!
//! Records are returned in file order; the simulator admits them in that
//! order, which fixes the left-to-right packing inside each row.

pub mod error;
pub mod loader;
pub mod record;


pub use error::{FeedError, FeedResult};
pub use loader::{load_arrivals_csv, load_arrivals_reader};
pub use record::ArrivalRecord;
