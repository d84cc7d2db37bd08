//! End-to-end listing lifecycle through the validator and registry.

use auction_house::config::DEFAULT_DURATION_SECS;
use auction_house::{AuctionConfig, ListingStatus, SaleKind, SaleType};

use crate::common::MarketHarness;

#[test]
fn test_fixed_price_listing_sold() {
    let harness = MarketHarness::new();
    let listing = harness.sell("alice", "250");

    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(listing.sale_type, SaleType::FixedPrice);
    assert_eq!(listing.expires_at, 1_000 + DEFAULT_DURATION_SECS);
    assert_eq!(harness.registry.active_count("alice"), 1);

    harness.advance(60);
    harness.registry.mark_sold(&listing.id, "bob").unwrap();

    assert_eq!(harness.registry.active_count("alice"), 0);
    let history = harness.registry.transactions_for("alice");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].buyer, "bob");
    assert_eq!(history[0].final_price, 250.0);
    assert_eq!(history[0].sold_at, 1_060);
}

#[test]
fn test_bidding_listing_won_by_highest_bidder() {
    let harness = MarketHarness::new();
    let listing = harness
        .submit(&harness.bidding_request("alice", "1000", "100", "10"))
        .unwrap();
    assert_eq!(listing.current_price, 100.0);

    let registry = &harness.registry;
    registry.record_bid(&listing.id, "bob", 100.0).unwrap();
    registry.record_bid(&listing.id, "carol", 110.0).unwrap();
    assert!(registry.record_bid(&listing.id, "bob", 115.0).is_err());
    registry.record_bid(&listing.id, "bob", 200.0).unwrap();

    let current = registry.get(&listing.id).unwrap();
    assert_eq!(current.current_price, 200.0);
    assert_eq!(current.current_owner_id, "bob");

    assert!(registry.settle_bid(&listing.id).is_err());
    harness.advance(DEFAULT_DURATION_SECS);
    registry.settle_bid(&listing.id).unwrap();

    let tx = &registry.transactions_for("bob")[0];
    assert_eq!(tx.sale_kind, SaleKind::BidWin);
    assert_eq!(tx.final_price, 200.0);
    assert!(registry.transactions_for("carol").is_empty());
}

#[test]
fn test_buy_now_during_bidding_pays_base_price() {
    let harness = MarketHarness::new();
    let listing = harness
        .submit(&harness.bidding_request("alice", "500", "100", "25"))
        .unwrap();
    harness.registry.record_bid(&listing.id, "bob", 100.0).unwrap();

    harness.advance(60);
    harness.registry.mark_sold(&listing.id, "bob").unwrap();

    let tx = &harness.registry.transactions_for("bob")[0];
    assert_eq!(tx.sale_kind, SaleKind::ImmediateBuy);
    assert_eq!(tx.final_price, 500.0);
    assert_eq!(
        harness.registry.get(&listing.id).unwrap().status,
        ListingStatus::Sold
    );
}

#[test]
fn test_unsold_listing_expires_and_is_reclaimable() {
    let harness = MarketHarness::new();
    let listing = harness.sell("alice", "50");

    harness.advance(DEFAULT_DURATION_SECS - 1);
    assert!(harness.registry.sweep_expired().is_empty());

    harness.advance(1);
    assert_eq!(harness.registry.sweep_expired(), vec![listing.id.clone()]);

    let reclaimable = harness.registry.expired_for("alice");
    assert_eq!(reclaimable.len(), 1);
    assert_eq!(reclaimable[0].item().unwrap().material, "DIAMOND");
    assert_eq!(harness.registry.active_count("alice"), 0);
}

#[test]
fn test_duration_tiers_pick_longest() {
    let harness = MarketHarness::new();
    let mut request = harness.request("alice", "10");
    request.duration_tiers = vec!["default:3600".into(), "vip:7d".into(), "broken".into()];

    let listing = harness.submit(&request).unwrap();
    assert_eq!(listing.duration_secs, 7 * 86_400);
    assert_eq!(listing.expires_at, 1_000 + 7 * 86_400);
}

#[test]
fn test_sell_limit_frees_up_after_cancel() {
    let harness = MarketHarness::with_config(AuctionConfig {
        sell_limit: 2,
        ..AuctionConfig::default()
    });
    let first = harness.sell("alice", "10");
    harness.sell("alice", "20");
    assert!(harness.submit(&harness.request("alice", "30")).is_err());

    harness.registry.cancel(&first.id).unwrap();
    harness.sell("alice", "30");
    assert_eq!(harness.registry.active_count("alice"), 2);
    assert_eq!(harness.registry.active_listings().len(), 2);
}

#[test]
fn test_listing_ids_are_unique() {
    let harness = MarketHarness::new();
    let a = harness.sell("alice", "10");
    let b = harness.sell("alice", "10");
    assert_ne!(a.id, b.id);
    assert_eq!(a.id.len(), 32);
}
