//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `simulation_records.csv`
//! - `out_list_records.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{ExitRow, OutputResult, StepRow};
use crate::writer::RecordWriter;

pub const STEP_HEADER: [&str; 13] = [
    "step", "action", "agent", "agent_x", "agent_y", "target_x", "target_y",
    "reward", "total_reward", "sim_date", "conflict_count", "residents", "done",
];

pub const EXIT_HEADER: [&str; 6] = ["item_id", "start_time", "exit_time", "exited_on", "step", "swept"];

/// Writes episode records to two CSV files.
pub struct CsvWriter {
    steps:    Writer<File>,
    exits:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut steps = Writer::from_path(dir.join("simulation_records.csv"))?;
        steps.write_record(STEP_HEADER)?;

        let mut exits = Writer::from_path(dir.join("out_list_records.csv"))?;
        exits.write_record(EXIT_HEADER)?;

        Ok(Self {
            steps,
            exits,
            finished: false,
        })
    }
}

impl RecordWriter for CsvWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
        self.steps.write_record(&[
            row.step.to_string(),
            row.action.to_string(),
            row.agent_label.clone(),
            row.agent_x.to_string(),
            row.agent_y.to_string(),
            row.target_x.to_string(),
            row.target_y.to_string(),
            row.reward.to_string(),
            row.total_reward.to_string(),
            row.sim_date.clone(),
            row.conflict_count.to_string(),
            row.residents.to_string(),
            (row.done as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_exit(&mut self, row: &ExitRow) -> OutputResult<()> {
        self.exits.write_record(&[
            row.item_id.clone(),
            row.start_time.clone(),
            row.exit_time.clone(),
            row.exited_on.clone(),
            row.step.to_string(),
            (row.swept as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.exits.flush()?;
        Ok(())
    }
}
