//! `yard-output` — episode record writers for the yard_twin simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                          |
//! |-----------|---------|--------------------------------------------------------|
//! | *(none)*  | CSV     | `simulation_records.csv`, `out_list_records.csv`       |
//! | `sqlite`  | SQLite  | `records.db`                                           |
//!
//! Both implement [`RecordWriter`] and are driven by [`RecordObserver`],
//! which implements `yard_sim::YardObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use yard_output::{CsvWriter, RecordObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = RecordObserver::new(writer);
//! run_episode(&mut env, &mut GreedyPolicy, 10_000, &mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RecordObserver;
pub use row::{ExitRow, StepRow};
pub use writer::RecordWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
