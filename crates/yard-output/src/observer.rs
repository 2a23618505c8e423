//! `RecordObserver<W>` — bridges `YardObserver` to a `RecordWriter`.

use log::warn;

use yard_sim::{EpisodeSummary, ExitRecord, StepRecord, YardObserver};

use crate::row::{ExitRow, StepRow};
use crate::writer::RecordWriter;
use crate::{OutputError, OutputResult};

/// A [`YardObserver`] that writes step and exit rows to any
/// [`RecordWriter`] backend.
///
/// Errors from the writer are stored internally because `YardObserver`
/// methods have no return value.  After the episode, check for errors with
/// [`take_error`][Self::take_error].
pub struct RecordObserver<W: RecordWriter> {
    writer:     W,
    steps:      u64,
    exits:      u64,
    last_error: Option<OutputError>,
}

impl<W: RecordWriter> RecordObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            steps:      0,
            exits:      0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Rows written so far: `(steps, exits)`.
    pub fn counts(&self) -> (u64, u64) {
        (self.steps, self.exits)
    }

    /// Unwrap the inner writer (e.g. to inspect files after the episode).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                // Keep only the first error.
                if self.last_error.is_none() {
                    warn!("record writer failed: {e}");
                    self.last_error = Some(e);
                }
                false
            }
        }
    }
}

impl<W: RecordWriter> YardObserver for RecordObserver<W> {
    fn on_step(&mut self, record: &StepRecord) {
        let result = self.writer.write_step(&StepRow::from(record));
        if self.store_err(result) {
            self.steps += 1;
        }
    }

    fn on_exit(&mut self, record: &ExitRecord) {
        let result = self.writer.write_exit(&ExitRow::from(record));
        if self.store_err(result) {
            self.exits += 1;
        }
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
