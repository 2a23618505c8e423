//! Stored segments and their lifecycle status.

use std::fmt;

use chrono::NaiveDate;

use crate::{Cell, ItemId, Rect};

/// Where an item currently lives.
///
/// Exactly one status holds at any time.  The simulator moves `Item` values
/// between its cache, grid, carrier, and exit list, so the status of an item
/// is simply the container that owns it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemStatus {
    /// Arrived, waiting for `start_time`.
    Cached,
    /// Placed in the yard grid.
    Resident,
    /// In the carrier's custody (loaded, or parked on a road awaiting
    /// reinsertion after a conflict).
    Carried,
    /// Delivered past a boundary.  Terminal.
    Exited,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Cached   => "cached",
            ItemStatus::Resident => "resident",
            ItemStatus::Carried  => "carried",
            ItemStatus::Exited   => "exited",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular segment with arrival and exit timing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id:              ItemId,
    /// Label from the arrival feed (`B001`, …).
    pub label:           String,
    pub rect:            Rect,
    /// Earliest date the item may enter the yard.
    pub start_time:      NaiveDate,
    /// Processing period in days.  Informational only.
    pub processing_time: u32,
    /// Earliest date the item may leave the yard.
    pub exit_time:       NaiveDate,
    /// Scheduling slack; lower means more urgent.
    pub time_remain:     u32,
}

impl Item {
    pub fn new(
        id:         ItemId,
        label:      impl Into<String>,
        rect:       Rect,
        start_time: NaiveDate,
        exit_time:  NaiveDate,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            rect,
            start_time,
            processing_time: 0,
            exit_time,
            time_remain: 0,
        }
    }

    pub fn with_time_remain(mut self, time_remain: u32) -> Self {
        self.time_remain = time_remain;
        self
    }

    pub fn with_processing_time(mut self, days: u32) -> Self {
        self.processing_time = days;
        self
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        self.rect.cell()
    }

    /// Has the item's start date been reached?
    #[inline]
    pub fn is_due(&self, now: NaiveDate) -> bool {
        now >= self.start_time
    }

    /// Has the item's exit date been reached?
    #[inline]
    pub fn may_exit(&self, now: NaiveDate) -> bool {
        self.exit_time <= now
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} start {} exit {}",
            self.label, self.rect, self.start_time, self.exit_time
        )
    }
}
