//! Racing terminal transitions on shared listings.

use std::sync::{Arc, Barrier};
use std::thread;

use auction_house::{AuctionError, ListingStatus};

use crate::common::MarketHarness;

#[test]
fn test_expire_and_sale_race_has_one_winner() {
    for _ in 0..50 {
        let harness = MarketHarness::new();
        let listing = harness.sell("alice", "10");
        let barrier = Arc::new(Barrier::new(2));

        let expirer = {
            let registry = harness.registry.clone();
            let barrier = barrier.clone();
            let id = listing.id.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.expire(&id)
            })
        };
        let buyer = {
            let registry = harness.registry.clone();
            let barrier = barrier.clone();
            let id = listing.id.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.mark_sold(&id, "bob")
            })
        };

        let expired = expirer.join().unwrap();
        let sold = buyer.join().unwrap();
        assert!(expired.is_ok() != sold.is_ok(), "exactly one transition must win");

        let loser = if expired.is_ok() { sold.unwrap_err() } else { expired.unwrap_err() };
        assert!(matches!(loser, AuctionError::AlreadyFinal { .. }));

        let status = harness.registry.get(&listing.id).unwrap().status;
        let transactions = harness.registry.transactions_for("bob").len();
        match status {
            ListingStatus::Sold => assert_eq!(transactions, 1),
            ListingStatus::Expired => assert_eq!(transactions, 0),
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(harness.registry.active_count("alice"), 0);
    }
}

#[test]
fn test_parallel_cancels_keep_seller_count_exact() {
    let harness = MarketHarness::new();
    let ids: Vec<String> = (0..20).map(|_| harness.sell("alice", "10").id).collect();
    assert_eq!(harness.registry.active_count("alice"), 20);

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let registry = harness.registry.clone();
            thread::spawn(move || {
                registry.cancel(&id).unwrap();
                registry.cancel(&id).unwrap_err();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(harness.registry.active_count("alice"), 0);
    assert_eq!(harness.registry.expired_for("alice").len(), 20);
}

#[test]
fn test_parallel_adds_respect_limit() {
    let harness = Arc::new(MarketHarness::new());
    let limit = harness.registry.sell_limit();

    let handles: Vec<_> = (0..limit + 10)
        .map(|_| {
            let harness = harness.clone();
            thread::spawn(move || harness.submit(&harness.request("alice", "10")).is_ok())
        })
        .collect();
    let accepted = handles
        .into_iter()
        .filter_map(|h| h.join().ok())
        .filter(|ok| *ok)
        .count();

    assert_eq!(accepted, limit);
    assert!(harness.registry.is_at_limit("alice"));
}
