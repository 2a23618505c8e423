//! `yard-core` — foundational types for the `yard_twin` storage-yard simulator.
//!
//! This crate is a dependency of every other `yard-*` crate.  It has no
//! `yard-*` dependencies and few external ones (`chrono`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `ItemId`                                               |
//! | [`geom`]     | `Cell`, `Rect`, strict overlap test                    |
//! | [`item`]     | `Item`, `ItemStatus`                                   |
//! | [`time`]     | `YardClock`, `parse_date`                              |
//! | [`rng`]      | `SimRng` (seedable, single-threaded)                   |
//! | [`config`]   | `YardConfig`, `Roads`, `Road`, `ZoneConfig`            |
//! | [`error`]    | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and value types.  |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod item;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Road, Roads, YardConfig, ZoneConfig, MAX_EXTENT, ROAD_WIDTH};
pub use error::{CoreError, CoreResult};
pub use geom::{Cell, Rect};
pub use ids::ItemId;
pub use item::{Item, ItemStatus};
pub use rng::SimRng;
pub use time::{parse_date, YardClock};
