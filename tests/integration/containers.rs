//! Taking listed items out of a seller's inventory.

use auction_house::container::{count_matching, remove_quantity, similar_items};
use auction_house::Item;

fn inventory() -> Vec<Option<Item>> {
    vec![
        Some(Item::new("DIAMOND", 10)),
        None,
        Some(Item::new("DIAMOND", 64).with_display_name("&bShiny")),
        Some(Item::new("DIAMOND", 5)),
        Some(Item::new("EMERALD", 3)),
    ]
}

#[test]
fn test_listing_removes_across_stacks() {
    let mut inv = inventory();
    let target = Item::new("DIAMOND", 1);

    assert_eq!(count_matching(&inv, &target), 15);
    assert_eq!(similar_items(&inv, &target), vec![0, 3]);

    assert_eq!(remove_quantity(&mut inv, &target, 12), 12);
    assert!(inv[0].is_none());
    assert_eq!(inv[3].as_ref().map(|i| i.amount), Some(3));
    assert_eq!(inv[2].as_ref().map(|i| i.amount), Some(64));
}

#[test]
fn test_short_container_is_emptied_not_overdrawn() {
    let mut inv = inventory();
    let target = Item::new("EMERALD", 1);

    assert_eq!(remove_quantity(&mut inv, &target, 10), 3);
    assert_eq!(count_matching(&inv, &target), 0);
    assert_eq!(count_matching(&inv, &Item::new("DIAMOND", 1)), 15);
}
