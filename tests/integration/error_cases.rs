//! Rejections surfaced to the seller.

use auction_house::{AuctionConfig, AuctionError, Field, Item, ListingStatus};

use crate::common::MarketHarness;

fn strict() -> MarketHarness {
    MarketHarness::with_config(AuctionConfig {
        min_base_price: 10.0,
        max_base_price: 1_000.0,
        min_bid_increment: 1.0,
        max_bid_increment: 50.0,
        blocked_categories: vec!["BEDROCK".into()],
        sell_limit: 1,
        ..AuctionConfig::default()
    })
}

#[test]
fn test_non_numeric_price_names_field() {
    let harness = strict();
    let err = harness.submit(&harness.request("alice", "ten")).unwrap_err();
    assert!(matches!(err, AuctionError::NotANumber { field: Field::BasePrice, .. }));
    assert!(err.is_recoverable());
}

#[test]
fn test_price_bounds_are_inclusive() {
    let harness = strict();
    assert!(harness.submit(&harness.request("a", "10")).is_ok());
    assert!(harness.submit(&harness.request("b", "1000")).is_ok());

    let err = harness.submit(&harness.request("c", "1000.01")).unwrap_err();
    assert_eq!(err.field(), Some(Field::BasePrice));
}

#[test]
fn test_blocked_category_checked_before_price() {
    let harness = strict();
    let mut request = harness.request("alice", "not-a-number");
    request.category = "bedrock".into();
    assert!(matches!(
        harness.submit(&request),
        Err(AuctionError::Blocked { .. })
    ));
}

#[test]
fn test_limit_checked_before_price() {
    let harness = strict();
    harness.sell("alice", "20");
    assert!(matches!(
        harness.submit(&harness.request("alice", "garbage")),
        Err(AuctionError::LimitReached { limit: 1, .. })
    ));
}

#[test]
fn test_starting_bid_above_base_rejected() {
    let harness = strict();
    let err = harness
        .submit(&harness.bidding_request("alice", "100", "150", "5"))
        .unwrap_err();
    assert_eq!(err.field(), Some(Field::StartingBid));
}

#[test]
fn test_increment_out_of_range_rejected() {
    let harness = strict();
    let err = harness
        .submit(&harness.bidding_request("alice", "100", "50", "75"))
        .unwrap_err();
    assert_eq!(err.field(), Some(Field::BidIncrement));
}

#[test]
fn test_terminal_listing_cannot_be_resettled() {
    let harness = strict();
    let listing = harness.sell("alice", "20");
    harness.registry.cancel(&listing.id).unwrap();

    let err = harness.registry.mark_sold(&listing.id, "bob").unwrap_err();
    assert!(matches!(
        err,
        AuctionError::AlreadyFinal { status: ListingStatus::Cancelled, .. }
    ));
    assert!(harness.registry.transactions_for("bob").is_empty());
}

#[test]
fn test_air_stack_cannot_be_listed() {
    let harness = strict();
    let mut request = harness.request("alice", "20");
    request.item_payload = Item::new("AIR", 1).to_cbor().unwrap();

    assert!(matches!(
        harness.submit(&request),
        Err(AuctionError::EmptyItem { .. })
    ));
    assert_eq!(harness.registry.active_count("alice"), 0);
}
