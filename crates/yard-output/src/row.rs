//! Plain data row types written by output backends.

use yard_sim::{ExitRecord, StepRecord};

/// Dates are written as `YYYY/MM/DD`, the arrival feed's format.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// One environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRow {
    pub step:           u64,
    pub action:         u8,
    pub agent_label:    String,
    pub agent_x:        i32,
    pub agent_y:        i32,
    /// `(0, 0)` while idle.
    pub target_x:       i32,
    pub target_y:       i32,
    pub reward:         f64,
    pub total_reward:   f64,
    pub sim_date:       String,
    pub conflict_count: u32,
    pub residents:      u64,
    pub done:           bool,
}

impl From<&StepRecord> for StepRow {
    fn from(r: &StepRecord) -> Self {
        Self {
            step:           r.step,
            action:         r.action,
            agent_label:    r.agent_label.clone(),
            agent_x:        r.agent_position.x,
            agent_y:        r.agent_position.y,
            target_x:       r.target_position.x,
            target_y:       r.target_position.y,
            reward:         r.reward,
            total_reward:   r.total_reward,
            sim_date:       r.sim_date.format(DATE_FORMAT).to_string(),
            conflict_count: r.conflict_count,
            residents:      r.residents as u64,
            done:           r.done,
        }
    }
}

/// One item leaving the yard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRow {
    pub item_id:    String,
    pub start_time: String,
    pub exit_time:  String,
    pub exited_on:  String,
    pub step:       u64,
    pub swept:      bool,
}

impl From<&ExitRecord> for ExitRow {
    fn from(r: &ExitRecord) -> Self {
        Self {
            item_id:    r.label.clone(),
            start_time: r.start_time.format(DATE_FORMAT).to_string(),
            exit_time:  r.exit_time.format(DATE_FORMAT).to_string(),
            exited_on:  r.exited_on.format(DATE_FORMAT).to_string(),
            step:       r.step,
            swept:      r.swept,
        }
    }
}
