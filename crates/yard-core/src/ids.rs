//! Item identity.
//!
//! Items also carry a human label (`B001`, …) taken from the arrival feed;
//! the typed id is what the simulator compares and hashes.

use std::fmt;

/// Identity of a stored segment, assigned in arrival order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl ItemId {
    /// Sentinel for "no item".
    pub const INVALID: ItemId = ItemId(u32::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for ItemId {
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl TryFrom<usize> for ItemId {
    type Error = std::num::TryFromIntError;

    fn try_from(n: usize) -> Result<ItemId, Self::Error> {
        u32::try_from(n).map(ItemId)
    }
}
