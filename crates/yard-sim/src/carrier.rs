//! The carrier: the one mobile rectangle in the yard.

use yard_core::{Cell, Item, ItemId, Rect};

/// Side of the carrier's footprint when it carries nothing.
pub const IDLE_SIZE: i32 = 5;

/// The carrier.
///
/// While loaded its rectangle *is* the payload's footprint: loading snaps the
/// carrier onto the item, and moving the carrier moves the item with it.
#[derive(Clone, Debug)]
pub struct Carrier {
    rect:    Rect,
    payload: Option<Item>,
    /// Cell the payload was taken from.
    origin:  Option<Cell>,
    /// Has the carrier moved since its last pickup or deposit?
    moved:   bool,
    /// Item set down by the last conflict, ignored until the carrier is clear
    /// of it.
    exempt:  Option<ItemId>,
}

impl Carrier {
    pub fn new(at: Cell) -> Self {
        Self {
            rect:    Rect::new(at.x, at.y, IDLE_SIZE, IDLE_SIZE),
            payload: None,
            origin:  None,
            moved:   false,
            exempt:  None,
        }
    }

    #[inline]
    pub fn position(&self) -> Cell {
        self.rect.cell()
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn payload(&self) -> Option<&Item> {
        self.payload.as_ref()
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.payload.is_some()
    }

    /// Cell the current payload was picked up from.
    pub fn origin(&self) -> Option<Cell> {
        self.origin
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn exempt(&self) -> Option<ItemId> {
        self.exempt
    }

    /// `agent` when empty, `agent_<label>` when loaded.
    pub fn label(&self) -> String {
        match &self.payload {
            Some(item) => format!("agent_{}", item.label),
            None => "agent".to_owned(),
        }
    }

    /// Take `item` into custody, snapping onto its footprint.
    pub fn load(&mut self, item: Item) {
        debug_assert!(self.payload.is_none(), "carrier already loaded");
        self.rect = item.rect;
        self.origin = Some(item.cell());
        self.payload = Some(item);
        self.moved = false;
    }

    /// Set the payload down at the carrier's current footprint.
    ///
    /// The carrier keeps its anchor and shrinks back to the idle footprint.
    pub fn unload(&mut self) -> Option<Item> {
        let mut item = self.payload.take()?;
        item.rect = self.rect;
        self.rect = Rect::new(self.rect.x, self.rect.y, IDLE_SIZE, IDLE_SIZE);
        self.origin = None;
        self.moved = false;
        Some(item)
    }

    /// Move the anchor to `to`.
    pub fn move_to(&mut self, to: Cell) {
        if to != self.position() {
            self.rect.x = to.x;
            self.rect.y = to.y;
            if let Some(item) = &mut self.payload {
                item.rect = self.rect;
            }
            self.moved = true;
        }
    }

    /// Clear the moved flag after a conflict pass.
    pub(crate) fn settle(&mut self) {
        self.moved = false;
    }

    pub(crate) fn set_exempt(&mut self, id: Option<ItemId>) {
        self.exempt = id;
    }
}
