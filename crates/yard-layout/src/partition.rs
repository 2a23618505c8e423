//! `SegmentPartition` — three capacity-limited height zones and the row
//! layout they produce.

use std::fmt;

use log::debug;

use yard_core::{YardConfig, ZoneConfig};

use crate::{LayoutError, LayoutResult};

/// Tolerance scanned above an item's length when looking up its row.
const PLACEMENT_TOLERANCE: i32 = 4;

/// Wider tolerance used when relocating an item during a conflict.
const RELOCATION_TOLERANCE: i32 = 5;

// ── Zone ──────────────────────────────────────────────────────────────────────

/// A height band.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Zone {
    High,
    Mid,
    Low,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Zone::High => "high",
            Zone::Mid  => "mid",
            Zone::Low  => "low",
        })
    }
}

// ── RowSlot ───────────────────────────────────────────────────────────────────

/// A resolved row: its position in the combined list, height, and y-offset.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RowSlot {
    pub index:  usize,
    pub height: i32,
    pub y:      i32,
}

// ── SegmentPartition ──────────────────────────────────────────────────────────

/// Row heights grouped into high/mid/low zones with per-zone length budgets.
///
/// The high zone is seeded with the base row, so the combined row list is
/// never empty and `row_for` always has a fallback.
#[derive(Clone, Debug)]
pub struct SegmentPartition {
    zones:        ZoneConfig,
    first_offset: i32,
    zone_bases:   bool,
    yard_height:  i32,

    high: Vec<i32>,
    mid:  Vec<i32>,
    low:  Vec<i32>,

    high_left: i32,
    mid_left:  i32,
    low_left:  i32,

    /// Combined `high ++ mid ++ low`, each descending.
    rows:    Vec<i32>,
    /// y-offset of each entry in `rows`.
    offsets: Vec<i32>,
}

impl SegmentPartition {
    pub fn new(config: &YardConfig) -> Self {
        let zones = config.zones;
        let mut partition = Self {
            zones,
            first_offset: config.first_row_offset(),
            zone_bases:   config.zone_bases_enabled(),
            yard_height:  config.yard_height(),
            high:         vec![zones.base_row],
            mid:          Vec::new(),
            low:          Vec::new(),
            high_left:    zones.high_budget - zones.base_row,
            mid_left:     zones.mid_budget,
            low_left:     zones.low_budget,
            rows:         Vec::new(),
            offsets:      Vec::new(),
        };
        partition.rebuild();
        partition
    }

    /// Register a row height.
    ///
    /// Returns `Ok(true)` if the height was added, `Ok(false)` if it was
    /// already registered.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::Saturated`] if the layout already fills the yard and
    ///   no zone budget exceeds `height`.
    /// - [`LayoutError::NoZone`] if no zone's threshold window and remaining
    ///   budget accept `height`.
    /// - [`LayoutError::RowOutOfYard`] if the new layout would run past the
    ///   yard height.  The partition is left unchanged.
    pub fn insert(&mut self, height: i32) -> LayoutResult<bool> {
        self.insert_where(height, |_, _| false)
    }

    /// Like [`insert`][Self::insert], but refuses to move an occupied row.
    ///
    /// Adding a height can shift the rows after it.  `occupied(y, height)`
    /// is asked about every row whose offset would change; if it answers
    /// `true` the insert is rolled back with [`LayoutError::RowOccupied`].
    pub fn insert_where<F>(&mut self, height: i32, occupied: F) -> LayoutResult<bool>
    where
        F: Fn(i32, i32) -> bool,
    {
        if self.contains(height) {
            return Ok(false);
        }
        if self.is_saturated(height) {
            return Err(LayoutError::Saturated { height });
        }
        let zone = self.classify(height).ok_or(LayoutError::NoZone { height })?;

        let before: Vec<(i32, i32)> =
            self.rows.iter().copied().zip(self.offsets.iter().copied()).collect();

        let (list, left) = self.zone_mut(zone);
        // Descending: insert before the first smaller height.
        let at = list.partition_point(|&h| h > height);
        list.insert(at, height);
        *left -= height;
        self.rebuild();

        let yard_height = self.yard_height;
        if let Some(bottom) = self.bottom().filter(|&b| b >= yard_height) {
            self.retract(zone, height);
            return Err(LayoutError::RowOutOfYard { height, bottom });
        }
        let moved = before
            .into_iter()
            .find(|&(row, y)| {
                self.slot_of(row).is_some_and(|slot| slot.y != y) && occupied(y, row)
            });
        if let Some((row, y)) = moved {
            self.retract(zone, height);
            return Err(LayoutError::RowOccupied { height, row, y });
        }

        debug!("row {height} added to {zone} zone; rows now {:?}", self.rows);
        Ok(true)
    }

    /// Which zone would accept `height` right now, if any.
    pub fn classify(&self, height: i32) -> Option<Zone> {
        let z = &self.zones;
        if z.seg_mid <= height && height < z.seg_high && self.high_left >= height {
            Some(Zone::High)
        } else if z.seg_low < height && height < z.seg_mid && self.mid_left >= height {
            Some(Zone::Mid)
        } else if 0 < height && height <= z.seg_low && self.low_left >= height {
            Some(Zone::Low)
        } else {
            None
        }
    }

    /// Row for an item of `length`: the smallest registered height within
    /// `length ..= length + 4`, else the base row.
    pub fn row_for(&self, length: i32) -> RowSlot {
        self.scan(length, PLACEMENT_TOLERANCE)
    }

    /// Like [`row_for`][Self::row_for] with the wider relocation tolerance
    /// (`length ..= length + 5`).
    pub fn relocation_row(&self, length: i32) -> RowSlot {
        self.scan(length, RELOCATION_TOLERANCE)
    }

    /// The row at `index` in the combined list.
    pub fn slot(&self, index: usize) -> Option<RowSlot> {
        Some(RowSlot {
            index,
            height: *self.rows.get(index)?,
            y:      self.offsets[index],
        })
    }

    pub fn contains(&self, height: i32) -> bool {
        self.rows.contains(&height)
    }

    /// Combined row heights (`high ++ mid ++ low`).
    pub fn rows(&self) -> &[i32] {
        &self.rows
    }

    /// y-offset of each row in [`rows`][Self::rows].
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn zone_rows(&self, zone: Zone) -> &[i32] {
        match zone {
            Zone::High => &self.high,
            Zone::Mid  => &self.mid,
            Zone::Low  => &self.low,
        }
    }

    /// Remaining length budget of `zone`.
    pub fn budget(&self, zone: Zone) -> i32 {
        match zone {
            Zone::High => self.high_left,
            Zone::Mid  => self.mid_left,
            Zone::Low  => self.low_left,
        }
    }

    /// The registered row of exactly `height`.
    pub fn slot_of(&self, height: i32) -> Option<RowSlot> {
        self.rows.iter().position(|&h| h == height).and_then(|i| self.slot(i))
    }

    /// Lowest y covered by the layout.
    pub fn bottom(&self) -> Option<i32> {
        self.rows.iter().zip(&self.offsets).map(|(h, y)| h + y).max()
    }

    /// Tallest item any row can hold.  Everything falls back to the base
    /// row, so nothing taller than it is placeable.
    pub fn max_length(&self) -> i32 {
        self.zones.base_row
    }

    /// Height of the top boundary row.
    pub fn base_row(&self) -> i32 {
        self.zones.base_row
    }

    /// Height of the bottom boundary row.
    pub fn bottom_boundary_row(&self) -> i32 {
        self.zones.bottom_boundary_row
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn scan(&self, length: i32, tolerance: i32) -> RowSlot {
        (0..=tolerance)
            .find_map(|k| self.rows.iter().position(|&h| h == length + k))
            .and_then(|i| self.slot(i))
            .unwrap_or_else(|| RowSlot {
                index:  0,
                height: self.rows[0],
                y:      self.offsets[0],
            })
    }

    fn zone_mut(&mut self, zone: Zone) -> (&mut Vec<i32>, &mut i32) {
        match zone {
            Zone::High => (&mut self.high, &mut self.high_left),
            Zone::Mid  => (&mut self.mid, &mut self.mid_left),
            Zone::Low  => (&mut self.low, &mut self.low_left),
        }
    }

    /// Undo a successful `insert` of `height` into `zone`.
    fn retract(&mut self, zone: Zone, height: i32) {
        let (list, left) = self.zone_mut(zone);
        list.retain(|&h| h != height);
        *left += height;
        self.rebuild();
    }

    fn is_saturated(&self, height: i32) -> bool {
        let (Some(&last_h), Some(&last_y)) = (self.rows.last(), self.offsets.last()) else {
            return false;
        };
        last_h + last_y >= self.yard_height
            && self.high_left <= height
            && self.mid_left <= height
            && self.low_left <= height
    }

    fn rebuild(&mut self) {
        self.rows.clear();
        self.rows.extend_from_slice(&self.high);
        self.rows.extend_from_slice(&self.mid);
        self.rows.extend_from_slice(&self.low);

        let mid_start = self.high.len();
        let low_start = mid_start + self.mid.len();

        self.offsets.clear();
        let mut y = self.first_offset;
        for (i, &h) in self.rows.iter().enumerate() {
            // A zone base never pulls a zone up into the one above it.
            if self.zone_bases {
                if !self.mid.is_empty() && i == mid_start {
                    y = y.max(self.zones.mid_base);
                } else if !self.low.is_empty() && i == low_start {
                    y = y.max(self.zones.low_base);
                }
            }
            self.offsets.push(y);
            y += h;
        }
    }
}
