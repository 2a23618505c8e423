//! `yard-sim` — the step-driven storage-yard environment.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`lifecycle`] | `Yard` — cache, grid, exit list, clock; arrival gating          |
//! | [`carrier`]   | `Carrier` — the mobile rectangle and its payload                |
//! | [`tasks`]     | `TaskQueue`, `Interference`, boundary-road selection            |
//! | [`conflict`]  | `Strategy`, `StrategySource`, conflict resolution, row search   |
//! | [`motion`]    | `Action`, `binary_forward` strides, movement clamping           |
//! | [`rewards`]   | reward constants and distance shaping                           |
//! | [`env`]       | `YardEnv` and its `step` function                               |
//! | [`builder`]   | `YardEnvBuilder`                                                |
//! | [`observer`]  | `YardObserver`, step/exit records                               |
//! | [`policy`]    | `Policy`, `GreedyPolicy`, `run_episode`                         |
//! | [`event`]     | `StepEvent`, `ConflictOutcome`                                  |
//! | [`error`]     | `SimError`, `RecoveryError`, `SimResult<T>`                     |
//!
//! # Item custody
//!
//! Items move by value between containers, so each item is in exactly one
//! place at a time:
//!
//! ```text
//!   arrive ──► cache ──(start date)──► grid ──(pickup)──► carrier ──(road)──► out_list
//!                                       ▲                   │
//!                                       └──(conflict deposit / reinsertion)
//! ```
//!
//! A resident displaced by a swap is carried to a road and parked on its
//! interference record until the carrier returns to its origin.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `fx-hash` | Uses `rustc_hash::FxHashMap` for the grid.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use yard_core::YardConfig;
//! use yard_sim::{run_episode, GreedyPolicy, NoopObserver, YardEnvBuilder};
//!
//! let mut env = YardEnvBuilder::new(YardConfig::default())
//!     .arrivals(records)
//!     .build()?;
//! let summary = run_episode(&mut env, &mut GreedyPolicy, 10_000, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod carrier;
pub mod conflict;
pub mod env;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod motion;
pub mod observer;
pub mod policy;
pub mod rewards;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use builder::YardEnvBuilder;
pub use carrier::Carrier;
pub use conflict::{target_row, ConflictReport, FixedStrategy, Strategy, StrategySource};
pub use env::{EnvState, Phase, Step, StepInfo, YardEnv};
pub use error::{RecoveryError, SimError, SimResult};
pub use event::{ConflictOutcome, StepEvent};
pub use lifecycle::{Admission, Yard};
pub use motion::{binary_forward, Action, Stride};
pub use observer::{EpisodeSummary, ExitRecord, NoopObserver, StepRecord, YardObserver};
pub use policy::{run_episode, GreedyPolicy, Policy};
pub use tasks::{Interference, TaskQueue};
