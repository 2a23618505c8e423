use thiserror::Error;

use yard_core::{Cell, CoreError};
use yard_layout::LayoutError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("environment configuration error: {0}")]
    Config(String),

    #[error("yard is full ({capacity} residents); cannot admit {label}")]
    CapacityExceeded {
        label:    String,
        capacity: usize,
    },

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl From<CoreError> for SimError {
    fn from(e: CoreError) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;

/// A state inconsistency the environment detected and recovered from.
///
/// These never abort an episode; they are reported through
/// [`StepEvent::Recovery`][crate::StepEvent::Recovery] together with what was
/// done about them.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecoveryError {
    /// The carrier reached a pickup target that holds no resident.
    #[error("no resident at pickup target {cell}")]
    MissingItem { cell: Cell },

    /// The carrier reached an interior target while loaded.
    #[error("loaded carrier ({label}) reached interior target {cell}")]
    LoadedAtInterior { cell: Cell, label: String },

    /// A displaced item's origin was reached before the item was parked.
    #[error("interference origin {cell} reached but {label} was never parked")]
    NothingParked { cell: Cell, label: String },

    /// Interference records remain but no task leads back to them.
    #[error("{pending} interference record(s) left without a task")]
    StrandedInterference { pending: usize },
}
