//! The carrier's task stack and boundary-road selection.

use log::warn;

use yard_core::{Cell, Item, ItemId, Road, YardConfig};

use crate::Carrier;

// ── Interference ──────────────────────────────────────────────────────────────

/// A resident displaced by a swap.
///
/// The record is pushed when the resident is picked up.  Once the carrier
/// delivers it to a road the item is parked here, and it goes back into the
/// yard when the carrier revisits `origin`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interference {
    pub id:     ItemId,
    pub label:  String,
    pub origin: Cell,
    pub parked: Option<Item>,
}

// ── TaskQueue ─────────────────────────────────────────────────────────────────

/// Pending carrier targets and displaced residents.  Both stacks are LIFO.
#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
    positions:   Vec<Cell>,
    interfering: Vec<Interference>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cell: Cell) {
        self.positions.push(cell);
    }

    pub fn pop(&mut self) -> Option<Cell> {
        self.positions.pop()
    }

    /// Pop the next target; `None` leaves the carrier idle.
    pub fn next_target(&mut self) -> Option<Cell> {
        self.positions.pop()
    }

    /// Pending positions, bottom of the stack first.
    pub fn positions(&self) -> &[Cell] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Drop every pending position.  Returns how many were dropped.
    pub fn clear_positions(&mut self) -> usize {
        let n = self.positions.len();
        self.positions.clear();
        n
    }

    // ── Interference ──────────────────────────────────────────────────────

    /// Record a displaced resident.  A resident already on the stack is not
    /// recorded twice.
    pub fn push_interference(&mut self, id: ItemId, label: impl Into<String>, origin: Cell) {
        if self.is_displaced(id) {
            return;
        }
        self.interfering.push(Interference {
            id,
            label: label.into(),
            origin,
            parked: None,
        });
    }

    pub fn is_displaced(&self, id: ItemId) -> bool {
        self.interfering.iter().any(|i| i.id == id)
    }

    pub fn top_interference(&self) -> Option<&Interference> {
        self.interfering.last()
    }

    pub fn pop_interference(&mut self) -> Option<Interference> {
        self.interfering.pop()
    }

    pub fn interfering(&self) -> &[Interference] {
        &self.interfering
    }

    pub fn has_interference(&self) -> bool {
        !self.interfering.is_empty()
    }

    /// Park a delivered displaced item on its record.
    ///
    /// Hands the item back if it has no open record.
    pub fn park(&mut self, item: Item) -> Result<(), Item> {
        match self
            .interfering
            .iter_mut()
            .find(|i| i.id == item.id && i.parked.is_none())
        {
            Some(record) => {
                record.parked = Some(item);
                Ok(())
            }
            None => Err(item),
        }
    }

    /// Take every interference record, most recent last.
    pub fn drain_interference(&mut self) -> Vec<Interference> {
        std::mem::take(&mut self.interfering)
    }

    /// Nothing pending on either stack.
    pub fn is_idle(&self) -> bool {
        self.positions.is_empty() && self.interfering.is_empty()
    }

    // ── Road selection ────────────────────────────────────────────────────

    /// Push the exit point of the enabled road closest to `from`.
    ///
    /// Distances are measured from `from`; the pushed point is built from
    /// the carrier's current anchor.  Ties go to the earlier road in
    /// [`Road::ALL`].  Returns `None`, pushing nothing, when no road is
    /// enabled.
    pub fn choose_road(&mut self, config: &YardConfig, from: Cell, carrier: &Carrier) -> Option<Road> {
        let height = config.yard_height();
        let road = nearest_road(config, from)?;
        let here = carrier.position();
        let exit = match road {
            Road::Left   => Cell::new(0, here.y),
            Road::Right  => Cell::new(config.width, here.y),
            Road::Top    => Cell::new(here.x, 0),
            Road::Bottom => Cell::new(here.x, height - carrier.rect().length),
        };
        self.positions.push(exit);
        Some(road)
    }
}

/// The enabled road closest to `from`, ties broken by [`Road::ALL`] order.
pub fn nearest_road(config: &YardConfig, from: Cell) -> Option<Road> {
    let height = config.yard_height();
    let road = config
        .roads
        .enabled()
        .map(|road| {
            let distance = match road {
                Road::Left   => from.x,
                Road::Right  => config.width - from.x,
                Road::Top    => from.y,
                Road::Bottom => height - from.y,
            };
            (distance, road)
        })
        // `enabled()` yields in ALL order; min_by_key keeps the first minimum.
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, road)| road);
    if road.is_none() {
        warn!("no boundary road enabled; cannot route from {from}");
    }
    road
}
