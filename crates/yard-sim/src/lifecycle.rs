//! Item lifecycle: arrival gating, placement, exit selection, and the
//! simulated calendar.
//!
//! [`Yard`] owns every item that is not in the carrier's custody: the cache
//! of arrived-but-not-yet-due items, the resident grid, and the exit history.

use std::cmp::Ordering;

use chrono::NaiveDate;
use log::{debug, info, warn};

use yard_core::{Cell, Item, YardClock, YardConfig};
use yard_layout::{LayoutError, SegmentPartition, YardGrid};

use crate::{ExitRecord, SimError, SimResult, StepEvent};

/// What [`Yard::check_arrival`] did with an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Placed in the grid.  `row_error` is set when the item's row height
    /// could not be registered and the default row was used.
    Placed {
        cell:      Cell,
        row_error: Option<LayoutError>,
    },
    /// Not yet due; held in the cache.
    Cached,
    /// Due, but no row can take it right now; held in the cache and
    /// retried every step.
    Deferred { error: LayoutError },
    /// An item with the same label is already cached; this one was dropped.
    Duplicate,
}

/// The stationary part of the environment.
pub struct Yard {
    pub config:    YardConfig,
    pub partition: SegmentPartition,
    pub grid:      YardGrid,
    /// Arrived items waiting for their start date, in arrival order.
    pub cache:     Vec<Item>,
    /// Append-only exit history.
    pub out_list:  Vec<ExitRecord>,
    pub clock:     YardClock,
}

impl Yard {
    pub fn new(config: YardConfig) -> Self {
        Self {
            partition: SegmentPartition::new(&config),
            grid:      YardGrid::new(),
            cache:     Vec::new(),
            out_list:  Vec::new(),
            clock:     YardClock::new(config.start_date),
            config,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.config.width
    }

    /// Effective height, including a bottom road when both roads are on.
    #[inline]
    pub fn height(&self) -> i32 {
        self.config.yard_height()
    }

    #[inline]
    pub fn now(&self) -> NaiveDate {
        self.clock.now()
    }

    pub fn is_full(&self) -> bool {
        self.grid.len() >= self.config.capacity
    }

    // ── Arrival ───────────────────────────────────────────────────────────

    /// Admit a newly arrived item.
    ///
    /// Due items are placed immediately; others wait in the cache.  A due
    /// item no row can take right now is cached as well.
    ///
    /// # Errors
    ///
    /// - [`SimError::CapacityExceeded`] if the item is due and the yard is
    ///   full.  The item is rejected.
    /// - [`SimError::Layout`] with [`LayoutError::Oversized`] or
    ///   [`LayoutError::OutOfYard`] if the item can never be placed.  The
    ///   item is rejected.
    pub fn check_arrival(&mut self, item: Item) -> SimResult<Admission> {
        self.check_fit(&item)?;
        if item.is_due(self.now()) {
            if self.is_full() {
                return Err(SimError::CapacityExceeded {
                    label:    item.label,
                    capacity: self.config.capacity,
                });
            }
            match self.place(item) {
                Ok((cell, row_error)) => return Ok(Admission::Placed { cell, row_error }),
                Err((error, item)) => {
                    warn!("{}: {error}; holding it until a row frees up", item.label);
                    self.cache.push(item);
                    return Ok(Admission::Deferred { error });
                }
            }
        }
        if self.cache.iter().any(|cached| cached.label == item.label) {
            warn!("{} is already cached; dropping duplicate arrival", item.label);
            return Ok(Admission::Duplicate);
        }
        debug!("caching {} until {}", item.label, item.start_time);
        self.cache.push(item);
        Ok(Admission::Cached)
    }

    /// Reject items no row or position in this yard can hold.
    fn check_fit(&self, item: &Item) -> SimResult<()> {
        let max = self.partition.max_length();
        if item.rect.length > max {
            return Err(LayoutError::Oversized {
                label: item.label.clone(),
                length: item.rect.length,
                max,
            }
            .into());
        }
        let width = self.width();
        if item.rect.x < 0 || item.rect.width > width || item.rect.x > width - item.rect.width {
            return Err(LayoutError::OutOfYard {
                label: item.label.clone(),
                rect:  item.rect,
            }
            .into());
        }
        Ok(())
    }

    /// Place every cached item that has become due.
    ///
    /// Items that are due while the yard is full stay cached and are
    /// reported as [`StepEvent::CapacityDeferred`]; items no row can take
    /// yet stay cached as [`StepEvent::PlacementDeferred`].
    pub fn flush_cache(&mut self, events: &mut Vec<StepEvent>) {
        if self.cache.is_empty() {
            return;
        }
        let now = self.now();
        for item in std::mem::take(&mut self.cache) {
            if !item.is_due(now) {
                self.cache.push(item);
                continue;
            }
            if self.is_full() {
                events.push(StepEvent::CapacityDeferred { label: item.label.clone() });
                self.cache.push(item);
                continue;
            }
            let label = item.label.clone();
            match self.place(item) {
                Ok((cell, row_error)) => {
                    if let Some(error) = row_error {
                        events.push(StepEvent::RowRejected { label: label.clone(), error });
                    }
                    events.push(StepEvent::Admitted { label, cell });
                }
                Err((error, item)) => {
                    debug!("{label}: {error}; still waiting for a row");
                    events.push(StepEvent::PlacementDeferred { label, error });
                    self.cache.push(item);
                }
            }
        }
    }

    /// Register the item's row height and pack it into its row.
    ///
    /// A height that cannot be registered is logged and the item goes into
    /// the nearest registered row that holds it (the base row at worst).
    /// Registration never moves a row that has residents.  Capacity is not
    /// checked here.
    ///
    /// # Errors
    ///
    /// The item is handed back when its row has no room left before the
    /// yard's right edge, or no registered row is tall enough.
    pub fn place(&mut self, mut item: Item) -> Result<(Cell, Option<LayoutError>), (LayoutError, Item)> {
        let length = item.rect.length;
        // The first item of a row keeps its own x, kept clear of the right edge.
        item.rect.x = item.rect.x.min(self.width() - item.rect.width).max(0);
        let grid = &self.grid;
        let row_error = self
            .partition
            .insert_where(length, |y, height| grid.occupies_band(y, height))
            .err();
        let row = self.partition.row_for(length);
        if row.height < length {
            let error = row_error.unwrap_or(LayoutError::NoZone { height: length });
            return Err((error, item));
        }
        let cell = self.grid.next_anchor(row.y, item.rect.x);
        if cell.x + item.rect.width > self.width() {
            let error = LayoutError::RowFull { y: row.y, label: item.label.clone() };
            return Err((error, item));
        }
        if let Some(e) = &row_error {
            warn!("{}: {e}; using row {}", item.label, row.height);
        }
        let label = item.label.clone();
        let cell = self.grid.place(item, row.y);
        debug!("placed {label} at {cell} (row {})", row.height);
        Ok((cell, row_error))
    }

    /// Put an item back into the yard by row.  When no row can take it, it
    /// waits in the cache and is retried with the other due arrivals.
    pub fn place_or_hold(&mut self, item: Item) -> Result<Cell, LayoutError> {
        match self.place(item) {
            Ok((cell, _)) => Ok(cell),
            Err((error, item)) => {
                warn!("{}: {error}; holding it in the cache", item.label);
                self.cache.push(item);
                Err(error)
            }
        }
    }

    /// Put a parked item back at the start of its row.
    pub fn reinsert(&mut self, mut item: Item) -> Result<Cell, LayoutError> {
        item.rect.x = 1;
        self.place_or_hold(item)
    }

    // ── Exit selection ────────────────────────────────────────────────────

    /// The resident that should leave next: earliest `exit_time`, then
    /// lowest `time_remain`, then leftmost.  Remaining ties go by `y` and
    /// label.
    pub fn earliest_exit_candidate(&self) -> Option<&Item> {
        self.grid.residents().min_by(|a, b| exit_order(a, b))
    }

    /// Date the clock should jump to when nothing is due: the earliest
    /// resident exit, or with no residents the earliest cached start.
    pub fn next_event_date(&self) -> Option<NaiveDate> {
        if self.grid.is_empty() {
            self.cache.iter().map(|item| item.start_time).min()
        } else {
            self.grid.residents().map(|item| item.exit_time).min()
        }
    }

    /// Jump the clock forward to [`next_event_date`][Self::next_event_date].
    ///
    /// Returns the new date if the clock moved.
    pub fn advance_clock(&mut self) -> Option<NaiveDate> {
        let date = self.next_event_date()?;
        if self.clock.advance_to(date) {
            info!("clock advanced to {}", self.clock);
            Some(date)
        } else {
            None
        }
    }

    /// Append `item` to the exit history.
    pub fn record_exit(&mut self, item: Item, step: u64, swept: bool) -> ExitRecord {
        let record = ExitRecord {
            item_id:    item.id,
            label:      item.label,
            start_time: item.start_time,
            exit_time:  item.exit_time,
            exited_on:  self.clock.now(),
            step,
            swept,
        };
        self.out_list.push(record.clone());
        record
    }
}

fn exit_order(a: &Item, b: &Item) -> Ordering {
    a.exit_time
        .cmp(&b.exit_time)
        .then(a.time_remain.cmp(&b.time_remain))
        .then(a.rect.x.cmp(&b.rect.x))
        .then(a.rect.y.cmp(&b.rect.y))
        .then_with(|| a.label.cmp(&b.label))
}
