//! Counting and removing items from a host container.

use tracing::debug;

use crate::item::Item;
use crate::traits::ItemContainer;

fn occupied_matches<'a, C: ItemContainer + ?Sized>(
    container: &'a C,
    target: &'a Item,
) -> impl Iterator<Item = (usize, &'a Item)> + 'a {
    (0..container.slot_count()).filter_map(move |i| {
        container
            .slot(i)
            .filter(|item| !item.is_air() && target.matches_identity(item))
            .map(|item| (i, item))
    })
}

/// Total quantity of items in `container` that match `target`.
pub fn count_matching<C: ItemContainer + ?Sized>(container: &C, target: &Item) -> u64 {
    occupied_matches(container, target)
        .map(|(_, item)| u64::from(item.amount))
        .sum()
}

/// Indices of the slots whose content matches `target`, in slot order.
pub fn similar_items<C: ItemContainer + ?Sized>(container: &C, target: &Item) -> Vec<usize> {
    occupied_matches(container, target).map(|(i, _)| i).collect()
}

/// Remove up to `amount` items matching `target`, walking slots in order.
///
/// Whole stacks are cleared while they fit in the remaining amount; the
/// first stack larger than the remainder is shrunk instead. Returns how many
/// items were removed, which is less than `amount` when the container did
/// not hold enough.
pub fn remove_quantity<C: ItemContainer + ?Sized>(
    container: &mut C,
    target: &Item,
    amount: u32,
) -> u32 {
    let mut remaining = amount;

    for index in 0..container.slot_count() {
        if remaining == 0 {
            break;
        }
        let Some(item) = container.slot_mut(index) else {
            continue;
        };
        if item.is_air() || !target.matches_identity(item) {
            continue;
        }

        if item.amount <= remaining {
            remaining -= item.amount;
            container.clear_slot(index);
        } else {
            item.amount -= remaining;
            remaining = 0;
        }
    }

    let removed = amount - remaining;
    if remaining > 0 {
        debug!(
            "Removed {} of {} requested '{}' items; container ran out",
            removed,
            amount,
            target.material
        );
    }
    removed
}
