//! Bundles listed and reclaimed through the marketplace.

use auction_house::bundle::embedding_set_id;
use auction_house::mocks::MockRandom;
use auction_house::{create_bundle, is_bundle, unpack, AuctionError, BundleConfig, Item, TagValue};

use crate::common::MarketHarness;

fn contents() -> Vec<Item> {
    vec![
        Item::new("DIAMOND_SWORD", 1)
            .with_display_name("&bExcalibur")
            .with_enchantment("SHARPNESS:5"),
        Item::new("GOLDEN_APPLE", 16),
        Item::player_head("eyJ0ZXh0dXJlcyI6e319", 1),
    ]
}

#[test]
fn test_bundle_survives_listing_round_trip() {
    let harness = MarketHarness::new();
    let bundle = create_bundle(
        &Item::new("DIAMOND_SWORD", 1),
        &contents(),
        &BundleConfig::default(),
        &harness.rng,
    )
    .unwrap();
    assert_eq!(bundle.display_name.as_deref(), Some("&eDiamond Sword Bundle"));

    let mut request = harness.request("alice", "500");
    request.item_payload = bundle.to_cbor().unwrap();
    let listing = harness.submit(&request).unwrap();

    let restored = listing.item().unwrap();
    assert!(is_bundle(&restored));
    assert_eq!(unpack(&restored).unwrap(), Some(contents()));
}

#[test]
fn test_two_bundles_get_distinct_sets() {
    let rng = MockRandom::default_seed();
    let a = create_bundle(&Item::new("CHEST", 1), &contents(), &BundleConfig::default(), &rng).unwrap();
    let b = create_bundle(&Item::new("CHEST", 1), &contents(), &BundleConfig::default(), &rng).unwrap();
    assert_ne!(embedding_set_id(&a), embedding_set_id(&b));
}

#[test]
fn test_truncated_bundle_is_unusable() {
    let rng = MockRandom::default_seed();
    let mut bundle =
        create_bundle(&Item::new("CHEST", 1), &contents(), &BundleConfig::default(), &rng).unwrap();
    bundle.set_tag("bundle-item-1", TagValue::Bytes(vec![0xff, 0x00]));

    let err = unpack(&bundle).unwrap_err();
    assert!(matches!(err, AuctionError::CorruptBundle { index: 1, .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn test_plain_item_is_not_a_bundle() {
    assert_eq!(unpack(&Item::new("STONE", 64)).unwrap(), None);
}
