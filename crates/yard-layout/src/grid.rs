//! `YardGrid` — the mapping from anchor cell to resident item.
//!
//! Keys are top-left anchors, so one item per cell.  The grid also remembers
//! insertion order: conflict resolution needs "the most recently placed
//! resident", and sweeps must pick deterministically.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use log::debug;

use yard_core::{Cell, Item, ItemId, Rect};

use crate::LayoutError;

/// Strict axis-aligned overlap.  Touching edges do not collide.
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

struct Resident {
    item: Item,
    /// Insertion sequence number; higher = more recent.
    seq:  u64,
}

/// Resident items keyed by anchor cell.
#[derive(Default)]
pub struct YardGrid {
    cells:    HashMap<Cell, Resident>,
    next_seq: u64,
}

impl YardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, cell: Cell) -> Option<&Item> {
        self.cells.get(&cell).map(|r| &r.item)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Find a resident by identity.
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.residents().find(|item| item.id == id)
    }

    /// All residents in arbitrary order.
    pub fn residents(&self) -> impl Iterator<Item = &Item> {
        self.cells.values().map(|r| &r.item)
    }

    /// Place `item` into the row at `row_y`, packed after the row's
    /// rightmost occupant.
    ///
    /// Residents whose anchor y is within one unit of `row_y` share the row.
    /// If the row is empty the item keeps its own x.
    pub fn place(&mut self, mut item: Item, row_y: i32) -> Cell {
        let cell = self.next_anchor(row_y, item.rect.x);
        item.rect.x = cell.x;
        item.rect.y = cell.y;
        // Packing puts the new anchor strictly right of every anchor in the
        // row window, so the key is free.
        debug_assert!(!self.cells.contains_key(&cell));
        self.push(cell, item);
        cell
    }

    /// Insert `item` at its own anchor without packing.
    ///
    /// # Errors
    ///
    /// [`LayoutError::CellOccupied`] if another resident holds the anchor.
    /// The rejected item is handed back alongside the error.
    pub fn insert_at(&mut self, item: Item) -> Result<Cell, (LayoutError, Item)> {
        let cell = item.cell();
        if let Some(other) = self.cells.get(&cell) {
            let error = LayoutError::CellOccupied {
                cell,
                occupant: other.item.label.clone(),
            };
            return Err((error, item));
        }
        self.push(cell, item);
        Ok(cell)
    }

    /// Is `cell` free, or held by `except`?
    pub fn is_free_for(&self, cell: Cell, except: Option<ItemId>) -> bool {
        self.cells
            .get(&cell)
            .map_or(true, |r| Some(r.item.id) == except)
    }

    /// Remove the resident anchored at `cell`.  `None` if the cell is empty.
    pub fn remove(&mut self, cell: Cell) -> Option<Item> {
        match self.cells.remove(&cell) {
            Some(r) => Some(r.item),
            None => {
                debug!("remove: no resident at {cell}");
                None
            }
        }
    }

    /// Where [`place`][Self::place] would anchor an item that starts at
    /// `x`: one past the rightmost resident in the row window, or `x` itself
    /// in an empty row.
    pub fn next_anchor(&self, row_y: i32, x: i32) -> Cell {
        let x = self
            .filter_row(row_y)
            .into_iter()
            .max_by_key(|it| (it.rect.x, it.rect.y))
            .map_or(x, |last| last.rect.right().saturating_add(1));
        Cell::new(x, row_y)
    }

    /// Does any resident reach into the band `y .. y + height`?
    pub fn occupies_band(&self, y: i32, height: i32) -> bool {
        self.residents().any(|item| item.rect.y < y + height && item.rect.bottom() > y)
    }

    /// Residents whose anchor y is `y - 1 ..= y + 1`.
    pub fn filter_row(&self, y: i32) -> Vec<&Item> {
        self.residents()
            .filter(|item| (item.rect.y - y).abs() <= 1)
            .collect()
    }

    /// Anchors of residents overlapping `rect`, sorted, skipping `exclude`.
    pub fn colliding(&self, rect: &Rect, exclude: Option<ItemId>) -> Vec<Cell> {
        let mut hits: Vec<Cell> = self
            .cells
            .iter()
            .filter(|(_, r)| Some(r.item.id) != exclude && collides(rect, &r.item.rect))
            .map(|(&cell, _)| cell)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Does `rect` overlap any resident other than `exclude`?
    pub fn any_collision(&self, rect: &Rect, exclude: Option<ItemId>) -> bool {
        self.cells
            .values()
            .any(|r| Some(r.item.id) != exclude && collides(rect, &r.item.rect))
    }

    /// Remove and return one resident that has left `[0, width) × [0, height)`.
    ///
    /// At most one item per call; the earliest placed wins.
    pub fn sweep_exits(&mut self, width: i32, height: i32) -> Option<Item> {
        let cell = self
            .cells
            .iter()
            .filter(|(_, r)| r.item.rect.outside(width, height))
            .min_by_key(|(_, r)| r.seq)
            .map(|(&cell, _)| cell)?;
        self.cells.remove(&cell).map(|r| r.item)
    }

    /// Remove and return the most recently inserted resident.
    pub fn pop_last(&mut self) -> Option<Item> {
        let cell = self
            .cells
            .iter()
            .max_by_key(|(_, r)| r.seq)
            .map(|(&cell, _)| cell)?;
        self.cells.remove(&cell).map(|r| r.item)
    }

    fn push(&mut self, cell: Cell, item: Item) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.cells.insert(cell, Resident { item, seq });
    }
}
