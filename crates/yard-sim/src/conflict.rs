//! Conflict resolution between the loaded carrier and residents.
//!
//! When the loaded carrier's footprint overlaps a resident after a move,
//! one of three strategies clears the way:
//!
//! | Strategy      | Resident                     | Payload                |
//! |---------------|------------------------------|------------------------|
//! | `Swap`        | carried to a road, reinserted later | set down in place |
//! | `Relocate`    | moved to an adjacent row     | kept                   |
//! | `DirectEvict` | moved, then carried out      | set down in place      |
//!
//! Strategies that cannot apply degrade to `Swap` (no acceptable row) or
//! `Relocate` (the carrier cell is taken).  Nothing is ever dropped.

use std::fmt;

use log::{debug, warn};

use yard_core::{Cell, Item, ItemId, SimRng};
use yard_layout::collides;

use crate::env::YardEnv;
use crate::{Carrier, ConflictOutcome, StepEvent, Yard};

/// Reward deducted per conflict.
pub const CONFLICT_PENALTY: f64 = 3000.0;

// ── Strategy ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Strategy {
    Swap,
    Relocate,
    DirectEvict,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Swap, Strategy::Relocate, Strategy::DirectEvict];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Swap        => "swap",
            Strategy::Relocate    => "relocate",
            Strategy::DirectEvict => "direct_evict",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of conflict strategies.
pub trait StrategySource {
    fn pick(&mut self) -> Strategy;
}

/// Uniform choice.
impl StrategySource for SimRng {
    fn pick(&mut self) -> Strategy {
        Strategy::ALL[self.gen_range(0..Strategy::ALL.len())]
    }
}

/// Always the same strategy.
#[derive(Copy, Clone, Debug)]
pub struct FixedStrategy(pub Strategy);

impl StrategySource for FixedStrategy {
    fn pick(&mut self) -> Strategy {
        self.0
    }
}

// ── ConflictReport ────────────────────────────────────────────────────────────

/// Result of one conflict pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConflictReport {
    pub conflicts: u32,
    /// `conflicts × CONFLICT_PENALTY`.
    pub penalty:   f64,
    pub events:    Vec<StepEvent>,
}

// ── Row search ────────────────────────────────────────────────────────────────

/// Find a row next to the resident at `cell` that it can be moved into.
///
/// The resident's row is looked up with the relocation tolerance; the rows
/// directly above and below it are candidates.  A candidate must fit the
/// resident snugly (`height - length` is 0 or 1) and must not be the base
/// row (above) or the bottom boundary row (below).  The resident's
/// footprint at the candidate offset must stay inside the yard and overlap
/// neither another resident nor the carrier.
pub fn target_row(yard: &Yard, carrier: &Carrier, cell: Cell) -> Option<Cell> {
    let item = yard.grid.get(cell)?;
    let partition = &yard.partition;
    let length = item.rect.length;
    let slot = partition.relocation_row(length);

    let up = slot
        .index
        .checked_sub(1)
        .and_then(|i| partition.slot(i))
        .filter(|row| row.height != partition.base_row());
    let down = partition
        .slot(slot.index + 1)
        .filter(|row| row.height != partition.bottom_boundary_row());

    [up, down]
        .into_iter()
        .flatten()
        .filter(|row| row.height >= length && row.height - length < 2)
        .map(|row| Cell::new(item.rect.x, row.y))
        .find(|&to| {
            let moved = item.rect.at(to);
            !moved.outside(yard.width(), yard.height())
                && !yard.grid.any_collision(&moved, Some(item.id))
                && !collides(&moved, carrier.rect())
        })
}

// ── Resolution ────────────────────────────────────────────────────────────────

impl<S: StrategySource> YardEnv<S> {
    /// Resolve every resident the loaded carrier overlaps.
    ///
    /// Does nothing unless the carrier is loaded and has moved since its
    /// last pickup or deposit.  Residents are taken from a sorted snapshot
    /// and re-checked against the carrier's current footprint before each
    /// resolution, since an earlier resolution may have changed it.
    pub fn resolve_conflicts(&mut self) -> ConflictReport {
        let mut report = ConflictReport::default();
        if !(self.carrier.is_loaded() && self.carrier.has_moved()) {
            return report;
        }
        self.carrier.settle();
        self.refresh_exempt();

        let snapshot = self.yard.grid.colliding(self.carrier.rect(), self.carrier.exempt());
        for cell in snapshot {
            let Some(resident) = self.yard.grid.get(cell) else { continue };
            if !self.carrier.is_loaded()
                || Some(resident.id) == self.carrier.exempt()
                || !collides(self.carrier.rect(), &resident.rect)
            {
                continue;
            }
            let resident_label = resident.label.clone();
            let carried = self.carrier.label();

            report.conflicts += 1;
            self.conflict_count += 1;
            let requested = self.strategy.pick();
            let outcome = self.apply_strategy(requested, cell, &mut report.events);
            debug!("conflict {carried} × {resident_label}: {requested} → {outcome:?}");
            report.events.push(StepEvent::Conflict {
                carried,
                resident: resident_label,
                requested,
                outcome,
            });
        }
        report.penalty = f64::from(report.conflicts) * CONFLICT_PENALTY;
        report
    }

    fn apply_strategy(
        &mut self,
        strategy: Strategy,
        cell:     Cell,
        events:   &mut Vec<StepEvent>,
    ) -> ConflictOutcome {
        match strategy {
            Strategy::Swap => self.swap(cell, events),
            Strategy::Relocate => match target_row(&self.yard, &self.carrier, cell) {
                Some(to) => self.relocate(cell, to),
                None => {
                    self.no_valid_row(cell, events);
                    self.swap(cell, events)
                }
            },
            Strategy::DirectEvict => match target_row(&self.yard, &self.carrier, cell) {
                Some(to) => self.evict(cell, to),
                None => {
                    self.no_valid_row(cell, events);
                    self.swap(cell, events)
                }
            },
        }
    }

    /// Set the payload down, pick the resident up, and come back for both.
    fn swap(&mut self, cell: Cell, events: &mut Vec<StepEvent>) -> ConflictOutcome {
        let here = self.carrier.position();
        let Some(resident_id) = self.yard.grid.get(cell).map(|r| r.id) else {
            return ConflictOutcome::Unresolved;
        };
        if !self.yard.grid.is_free_for(here, Some(resident_id)) {
            return match target_row(&self.yard, &self.carrier, cell) {
                Some(to) => self.relocate(cell, to),
                None => {
                    self.no_valid_row(cell, events);
                    ConflictOutcome::Unresolved
                }
            };
        }
        let Some(resident) = self.yard.grid.remove(cell) else {
            return ConflictOutcome::Unresolved;
        };
        let deposited = self.deposit();

        self.tasks.push_interference(resident.id, resident.label.clone(), cell);
        self.tasks.push(cell);
        self.tasks.push(here);
        self.carrier.load(resident);
        self.carrier.set_exempt(deposited);
        self.route_to_road(self.carrier.position());
        ConflictOutcome::Swapped
    }

    /// Move the resident to `to` and keep going with the payload.
    fn relocate(&mut self, cell: Cell, to: Cell) -> ConflictOutcome {
        if !self.move_resident(cell, to) {
            return ConflictOutcome::Unresolved;
        }
        let from = self.carrier.origin().unwrap_or_else(|| self.carrier.position());
        self.route_to_road(from);
        ConflictOutcome::Relocated { to }
    }

    /// Move the resident to `to`, set the payload down, and carry the
    /// resident out instead.
    fn evict(&mut self, cell: Cell, to: Cell) -> ConflictOutcome {
        let here = self.carrier.position();
        let Some(resident_id) = self.yard.grid.get(cell).map(|r| r.id) else {
            return ConflictOutcome::Unresolved;
        };
        if !self.yard.grid.is_free_for(here, Some(resident_id)) {
            return self.relocate(cell, to);
        }
        if !self.move_resident(cell, to) {
            return ConflictOutcome::Unresolved;
        }
        let deposited = self.deposit();
        let Some(resident) = self.yard.grid.remove(to) else {
            return ConflictOutcome::Unresolved;
        };
        self.carrier.load(resident);
        self.carrier.set_exempt(deposited);
        self.route_to_road(self.carrier.position());
        ConflictOutcome::Evicted { to }
    }

    /// Re-anchor the resident at `cell` to `to`.  On failure it stays put.
    fn move_resident(&mut self, cell: Cell, to: Cell) -> bool {
        let Some(mut item) = self.yard.grid.remove(cell) else {
            return false;
        };
        item.rect.x = to.x;
        item.rect.y = to.y;
        match self.yard.grid.insert_at(item) {
            Ok(_) => true,
            Err((error, mut item)) => {
                warn!("cannot move {} to {to}: {error}", item.label);
                item.rect.x = cell.x;
                item.rect.y = cell.y;
                self.put_back(item);
                false
            }
        }
    }

    /// Unload the payload into the grid at the carrier's anchor.
    fn deposit(&mut self) -> Option<ItemId> {
        let item = self.carrier.unload()?;
        let id = item.id;
        self.put_back(item);
        Some(id)
    }

    /// Insert at the item's own anchor, or by row if that anchor is taken.
    fn put_back(&mut self, item: Item) {
        if let Err((error, item)) = self.yard.grid.insert_at(item) {
            warn!("{}: {error}; placing by row", item.label);
            // On failure the item waits in the cache for a free row.
            let _ = self.yard.place_or_hold(item);
        }
    }

    /// Forget the exempt item once the carrier no longer overlaps it.
    fn refresh_exempt(&mut self) {
        let Some(id) = self.carrier.exempt() else { return };
        let clear = self
            .yard
            .grid
            .find(id)
            .is_none_or(|item| !collides(self.carrier.rect(), &item.rect));
        if clear {
            self.carrier.set_exempt(None);
        }
    }

    fn no_valid_row(&self, cell: Cell, events: &mut Vec<StepEvent>) {
        let label = self
            .yard
            .grid
            .get(cell)
            .map(|item| item.label.clone())
            .unwrap_or_default();
        debug!("no relocation row for {label} at {cell}");
        events.push(StepEvent::NoValidRow { label });
    }
}
