//! Slot-addressed item storage owned by the host (a player's inventory).

use crate::item::Item;

/// An ordered collection of item slots.
///
/// Slot order is stable: index `i` always names the same slot, and the
/// reconciler walks slots from `0` to `slot_count() - 1`.
pub trait ItemContainer {
    fn slot_count(&self) -> usize;

    fn slot(&self, index: usize) -> Option<&Item>;

    fn slot_mut(&mut self, index: usize) -> Option<&mut Item>;

    /// Empty the slot.
    fn clear_slot(&mut self, index: usize);
}

impl ItemContainer for Vec<Option<Item>> {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn slot(&self, index: usize) -> Option<&Item> {
        self.get(index).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.get_mut(index).and_then(Option::as_mut)
    }

    fn clear_slot(&mut self, index: usize) {
        if let Some(slot) = self.get_mut(index) {
            *slot = None;
        }
    }
}
