//! The `RecordWriter` trait.

use crate::{ExitRow, OutputResult, StepRow};

/// A sink for step and exit rows.
///
/// [`RecordObserver`][crate::RecordObserver] drives a writer and holds on to
/// the first error it returns; see
/// [`take_error`][crate::RecordObserver::take_error].
pub trait RecordWriter {
    fn write_step(&mut self, row: &StepRow) -> OutputResult<()>;

    fn write_exit(&mut self, row: &ExitRow) -> OutputResult<()>;

    /// Flush everything to disk.  Later calls do nothing.
    fn finish(&mut self) -> OutputResult<()>;
}
