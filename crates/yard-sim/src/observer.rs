//! Environment observer trait and the records it receives.

use chrono::NaiveDate;

use yard_core::{Cell, ItemId};

/// One row of the per-step history.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    /// 1-based step number.
    pub step:            u64,
    pub action:          u8,
    pub agent_position:  Cell,
    pub target_position: Cell,
    /// `agent` or `agent_<label>`.
    pub agent_label:     String,
    pub reward:          f64,
    pub total_reward:    f64,
    /// Simulated date at the end of the step.
    pub sim_date:        NaiveDate,
    pub conflict_count:  u32,
    pub residents:       usize,
    pub done:            bool,
}

/// One item leaving the yard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitRecord {
    pub item_id:    ItemId,
    pub label:      String,
    pub start_time: NaiveDate,
    pub exit_time:  NaiveDate,
    /// Simulated date the item actually left.
    pub exited_on:  NaiveDate,
    /// Step during which it left.
    pub step:       u64,
    /// `true` if it was swept past a boundary rather than delivered.
    pub swept:      bool,
}

/// Totals reported once an episode stops.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub steps:          u64,
    pub total_reward:   f64,
    pub conflict_count: u32,
    pub exits:          usize,
    /// `false` if the episode was cut off by a step limit.
    pub completed:      bool,
}

/// Callbacks invoked by [`YardEnv::step_with`][crate::YardEnv::step_with]
/// and [`run_episode`][crate::run_episode].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait YardObserver {
    /// Called once at the end of every effective step.
    fn on_step(&mut self, _record: &StepRecord) {}

    /// Called when an item leaves the yard, before the step's `on_step`.
    fn on_exit(&mut self, _record: &ExitRecord) {}

    /// Called once when the episode completes or is cut off.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}
}

/// A [`YardObserver`] that does nothing.
pub struct NoopObserver;

impl YardObserver for NoopObserver {}
