//! The set of listings and per-seller active counts.
//!
//! All state sits behind one lock so a status transition and the matching
//! seller counter update happen as a single step. Creation, the expiry
//! sweep and settlement can race on the same listing; whichever takes the
//! lock first wins and the others see `AlreadyFinal`.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::listing::{Listing, ListingStatus};
use super::transaction::{SaleKind, Transaction};
use crate::config::AuctionConfig;
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{SystemTimeProvider, TimeProvider};

#[derive(Default)]
struct RegistryState {
    listings: HashMap<String, Listing>,
    /// ACTIVE listings per seller; entries are removed at zero
    active_by_seller: HashMap<String, usize>,
    transactions: Vec<Transaction>,
}

impl RegistryState {
    fn active_count(&self, seller: &str) -> usize {
        self.active_by_seller.get(seller).copied().unwrap_or(0)
    }

    /// An ACTIVE listing still inside its selling window.
    fn open_listing(&self, id: &str, now: u64) -> AuctionResult<&Listing> {
        let listing = self
            .listings
            .get(id)
            .ok_or_else(|| AuctionError::NotFound(format!("listing {id}")))?;
        if listing.status.is_final() {
            return Err(AuctionError::AlreadyFinal {
                id: id.to_string(),
                status: listing.status,
            });
        }
        if listing.has_ended_at(now) {
            return Err(AuctionError::InvalidArgument(format!(
                "listing {id} ended at {}",
                listing.expires_at
            )));
        }
        Ok(listing)
    }

    /// Mark `id` sold and append the sale to the history.
    fn settle(
        &mut self,
        id: &str,
        buyer: &str,
        sale_kind: SaleKind,
        final_price: f64,
        sold_at: u64,
    ) -> AuctionResult<Listing> {
        let finished = self.finish(id, ListingStatus::Sold)?;
        self.transactions.push(Transaction {
            listing_id: finished.id.clone(),
            seller: finished.seller_id.clone(),
            buyer: buyer.to_string(),
            final_price,
            sale_kind,
            sold_at,
        });
        info!(
            "Listing {} sold to {} for {} ({:?})",
            id, buyer, final_price, sale_kind
        );
        Ok(finished)
    }

    /// Transition `id` to `status` and release its seller slot.
    fn finish(&mut self, id: &str, status: ListingStatus) -> AuctionResult<Listing> {
        let listing = self
            .listings
            .get_mut(id)
            .ok_or_else(|| AuctionError::NotFound(format!("listing {id}")))?;
        listing.finish(status)?;
        let finished = listing.clone();

        if let Some(count) = self.active_by_seller.get_mut(&finished.seller_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.active_by_seller.remove(&finished.seller_id);
            }
        }
        Ok(finished)
    }
}

fn sorted(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    listings
}

/// Shared registry of listings.
pub struct ListingRegistry<T: TimeProvider = SystemTimeProvider> {
    sell_limit: usize,
    time: T,
    state: Mutex<RegistryState>,
}

impl ListingRegistry<SystemTimeProvider> {
    pub fn new(sell_limit: usize) -> Self {
        Self::with_time(sell_limit, SystemTimeProvider::new())
    }

    pub fn from_config(config: &AuctionConfig) -> Self {
        Self::new(config.sell_limit)
    }
}

impl<T: TimeProvider> ListingRegistry<T> {
    pub fn with_time(sell_limit: usize, time: T) -> Self {
        Self {
            sell_limit,
            time,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub const fn sell_limit(&self) -> usize {
        self.sell_limit
    }

    /// Register an ACTIVE listing and count it against its seller.
    pub fn add(&self, listing: Listing) -> AuctionResult<String> {
        if listing.status != ListingStatus::Active {
            return Err(AuctionError::InvalidArgument(format!(
                "listing {} is {:?}, only active listings can be added",
                listing.id, listing.status
            )));
        }

        let mut state = self.state.lock();
        if state.listings.contains_key(&listing.id) {
            return Err(AuctionError::InvalidArgument(format!(
                "listing {} is already registered",
                listing.id
            )));
        }
        let active = state.active_count(&listing.seller_id);
        if active >= self.sell_limit {
            return Err(AuctionError::LimitReached {
                seller: listing.seller_id.clone(),
                limit: self.sell_limit,
            });
        }

        *state
            .active_by_seller
            .entry(listing.seller_id.clone())
            .or_insert(0) += 1;
        let id = listing.id.clone();
        info!(
            "Listed {} by {} at {} ({:?}), expires at {}",
            id, listing.seller_id, listing.base_price, listing.sale_type, listing.expires_at
        );
        state.listings.insert(id.clone(), listing);
        Ok(id)
    }

    pub fn expire(&self, id: &str) -> AuctionResult<Listing> {
        let finished = self.state.lock().finish(id, ListingStatus::Expired)?;
        debug!("Listing {} expired", id);
        Ok(finished)
    }

    pub fn cancel(&self, id: &str) -> AuctionResult<Listing> {
        let finished = self.state.lock().finish(id, ListingStatus::Cancelled)?;
        info!("Listing {} cancelled by {}", id, finished.seller_id);
        Ok(finished)
    }

    /// Buy a listing outright at its buy-now price.
    ///
    /// Open bids on a bidding listing do not change the price paid.
    pub fn mark_sold(&self, id: &str, buyer: &str) -> AuctionResult<Listing> {
        let now = self.time.now_unix();
        let mut state = self.state.lock();
        let listing = state.open_listing(id, now)?;
        if listing.seller_id == buyer {
            return Err(AuctionError::InvalidArgument(format!(
                "{buyer} cannot buy their own listing"
            )));
        }
        let price = listing.base_price;
        state.settle(id, buyer, SaleKind::ImmediateBuy, price, now)
    }

    /// Hand an ended bidding listing to its highest bidder at the bid price.
    pub fn settle_bid(&self, id: &str) -> AuctionResult<Listing> {
        let now = self.time.now_unix();
        let mut state = self.state.lock();
        let listing = state
            .listings
            .get(id)
            .ok_or_else(|| AuctionError::NotFound(format!("listing {id}")))?;
        if listing.status.is_final() {
            return Err(AuctionError::AlreadyFinal {
                id: id.to_string(),
                status: listing.status,
            });
        }
        if !listing.sale_type.is_bidding() {
            return Err(AuctionError::InvalidArgument(format!(
                "listing {id} is not a bidding listing"
            )));
        }
        if !listing.has_ended_at(now) {
            return Err(AuctionError::InvalidArgument(format!(
                "bidding on {id} runs until {}",
                listing.expires_at
            )));
        }
        if listing.current_owner_id == listing.seller_id {
            return Err(AuctionError::InvalidArgument(format!(
                "listing {id} received no bids"
            )));
        }
        let winner = listing.current_owner_id.clone();
        let price = listing.current_price;
        state.settle(id, &winner, SaleKind::BidWin, price, now)
    }

    /// Record a higher bid on an ACTIVE bidding listing.
    pub fn record_bid(&self, id: &str, bidder: &str, amount: f64) -> AuctionResult<Listing> {
        let now = self.time.now_unix();
        let mut state = self.state.lock();
        state.open_listing(id, now)?;
        let listing = state
            .listings
            .get_mut(id)
            .ok_or_else(|| AuctionError::NotFound(format!("listing {id}")))?;
        if listing.seller_id == bidder {
            return Err(AuctionError::InvalidArgument(format!(
                "{bidder} cannot bid on their own listing"
            )));
        }
        listing.raise_bid(bidder, amount)?;
        debug!("Bid of {} by {} on {}", amount, bidder, id);
        Ok(listing.clone())
    }

    /// Whether `seller` already holds the maximum number of ACTIVE listings.
    pub fn is_at_limit(&self, seller: &str) -> bool {
        self.state.lock().active_count(seller) >= self.sell_limit
    }

    pub fn active_count(&self, seller: &str) -> usize {
        self.state.lock().active_count(seller)
    }

    pub fn get(&self, id: &str) -> Option<Listing> {
        self.state.lock().listings.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ACTIVE listings, oldest first.
    pub fn active_listings(&self) -> Vec<Listing> {
        let state = self.state.lock();
        sorted(
            state
                .listings
                .values()
                .filter(|l| l.status == ListingStatus::Active)
                .cloned()
                .collect(),
        )
    }

    /// The seller's EXPIRED and CANCELLED listings, whose items they can reclaim.
    pub fn expired_for(&self, seller: &str) -> Vec<Listing> {
        let state = self.state.lock();
        sorted(
            state
                .listings
                .values()
                .filter(|l| {
                    l.seller_id == seller
                        && matches!(l.status, ListingStatus::Expired | ListingStatus::Cancelled)
                })
                .cloned()
                .collect(),
        )
    }

    /// Sales in which `player` was the buyer or the seller, in settlement order.
    pub fn transactions_for(&self, player: &str) -> Vec<Transaction> {
        self.state
            .lock()
            .transactions
            .iter()
            .filter(|t| t.involves(player))
            .cloned()
            .collect()
    }

    /// Close every ACTIVE listing whose deadline has passed at `now`.
    ///
    /// A bidding listing with a high bidder is sold to that bidder at the
    /// bid price; everything else expires. Returns the expired ids.
    pub fn sweep_expired_at(&self, now: u64) -> Vec<String> {
        let mut state = self.state.lock();
        let due: Vec<(String, Option<(String, f64)>)> = state
            .listings
            .values()
            .filter(|l| l.status == ListingStatus::Active && l.has_ended_at(now))
            .map(|l| {
                let winner = (l.sale_type.is_bidding() && l.current_owner_id != l.seller_id)
                    .then(|| (l.current_owner_id.clone(), l.current_price));
                (l.id.clone(), winner)
            })
            .collect();

        let mut expired = Vec::new();
        for (id, winner) in due {
            match winner {
                Some((bidder, price)) => {
                    if let Err(e) = state.settle(&id, &bidder, SaleKind::BidWin, price, now) {
                        debug!("Sweep could not settle {}: {}", id, e);
                    }
                }
                None => {
                    if state.finish(&id, ListingStatus::Expired).is_ok() {
                        expired.push(id);
                    }
                }
            }
        }
        drop(state);

        if !expired.is_empty() {
            info!("Expiry sweep closed {} listings", expired.len());
        }
        expired
    }

    /// Expire overdue listings using the registry clock.
    pub fn sweep_expired(&self) -> Vec<String> {
        self.sweep_expired_at(self.time.now_unix())
    }
}
