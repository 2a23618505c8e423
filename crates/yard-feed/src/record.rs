//! A validated arrival record.

use chrono::NaiveDate;

use yard_core::{Item, ItemId, Rect};

/// One row of the arrival feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub label:           String,
    pub rect:            Rect,
    pub start_time:      NaiveDate,
    pub exit_time:       NaiveDate,
    pub time_remain:     u32,
    pub processing_time: u32,
}

impl ArrivalRecord {
    /// Build the simulator's `Item` under identity `id`.
    pub fn into_item(self, id: ItemId) -> Item {
        Item::new(id, self.label, self.rect, self.start_time, self.exit_time)
            .with_time_remain(self.time_remain)
            .with_processing_time(self.processing_time)
    }
}
