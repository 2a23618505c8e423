//! Per-step diagnostics reported in [`StepInfo`][crate::StepInfo].

use chrono::NaiveDate;

use yard_core::{Cell, Road};
use yard_layout::LayoutError;

use crate::{RecoveryError, Strategy};

/// What a conflict resolution ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConflictOutcome {
    /// Payload deposited; the resident is now carried and will be reinserted.
    Swapped,
    /// Resident moved to another row; payload unchanged.
    Relocated { to: Cell },
    /// Resident relocated, payload deposited, resident carried out for good.
    Evicted { to: Cell },
    /// No strategy could be applied; nothing moved.
    Unresolved,
}

/// One notable thing that happened during a step.
#[derive(Clone, Debug, PartialEq)]
pub enum StepEvent {
    /// Action id outside `0..=3`.  The carrier did not move.
    InvalidAction(u8),
    /// A cached item became due and was placed.
    Admitted { label: String, cell: Cell },
    /// A cached item is due but the yard is at capacity.
    CapacityDeferred { label: String },
    /// A due item could not be placed in any row; it stays cached.
    PlacementDeferred { label: String, error: LayoutError },
    /// The item's row height could not be registered; it was placed in the
    /// nearest registered row instead.
    RowRejected { label: String, error: LayoutError },
    /// The clock jumped forward to the next exit or start date.
    ClockAdvanced { to: NaiveDate },
    /// A resident became the carrier's pickup target.
    TargetSelected { label: String, cell: Cell },
    /// The carrier collided with a resident.
    Conflict {
        carried:   String,
        resident:  String,
        requested: Strategy,
        outcome:   ConflictOutcome,
    },
    /// Relocation found no acceptable row for `label`.
    NoValidRow { label: String },
    /// A removal hit an empty cell.
    EmptyRemoval { cell: Cell },
    PickedUp { label: String, cell: Cell, road: Option<Road> },
    /// Delivered past a boundary and left the yard.
    Exited { label: String },
    /// Delivered past a boundary and parked until its origin is revisited.
    Parked { label: String },
    /// A parked item went back into the yard.
    Reinserted { label: String, cell: Cell },
    /// A resident outside the yard bounds was swept out.
    Swept { label: String },
    Recovery(RecoveryError),
    /// The episode completed this step.
    Completed,
}
