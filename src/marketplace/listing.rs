use serde::{Deserialize, Serialize};

use crate::config::MAX_ITEM_PAYLOAD_SIZE;
use crate::error::{AuctionError, AuctionResult, Field};
use crate::item::Item;
use crate::traits::TimeProvider;
use crate::util::{cbor_from_limited_reader, to_cbor};

/// Lifecycle state of a listing. Everything but `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    /// Open for purchase or bids
    Active,
    /// Bought outright or won by the highest bidder
    Sold,
    /// Reached `expires_at` unsold
    Expired,
    /// Withdrawn by the seller
    Cancelled,
}

impl ListingStatus {
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// How a listing resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SaleType {
    /// Single buy-now price.
    FixedPrice,
    /// Incremental bidding, with the base price still available as buy-now.
    Bidding { starting_bid: f64, bid_increment: f64 },
}

impl SaleType {
    pub const fn is_bidding(&self) -> bool {
        matches!(self, Self::Bidding { .. })
    }
}

/// A timed marketplace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Generated at creation, never changes
    pub id: String,

    pub seller_id: String,

    /// Equal to the seller until someone outbids them
    pub current_owner_id: String,

    /// CBOR-encoded [`Item`]; may itself be a bundle
    pub item_payload: Vec<u8>,

    /// Classification tag from the host's categorizer
    pub category: String,

    pub sale_type: SaleType,

    /// Buy-now price
    pub base_price: f64,

    /// Base price for fixed-price listings; the highest bid so far otherwise
    pub current_price: f64,

    pub duration_secs: u64,

    /// Unix timestamp when the listing was created
    pub created_at: u64,

    /// `created_at + duration_secs`, fixed at creation
    pub expires_at: u64,

    pub status: ListingStatus,
}

impl Listing {
    /// Create a listing builder stamped by `time`
    pub const fn builder_with_time<T: TimeProvider>(time: T) -> ListingBuilder<T> {
        ListingBuilder::new(time)
    }

    pub fn starting_bid(&self) -> Option<f64> {
        match self.sale_type {
            SaleType::Bidding { starting_bid, .. } => Some(starting_bid),
            SaleType::FixedPrice => None,
        }
    }

    pub fn bid_increment(&self) -> Option<f64> {
        match self.sale_type {
            SaleType::Bidding { bid_increment, .. } => Some(bid_increment),
            SaleType::FixedPrice => None,
        }
    }

    /// Still open and not yet past its deadline
    pub fn is_active_at(&self, now: u64) -> bool {
        self.status == ListingStatus::Active && self.expires_at > now
    }

    pub const fn has_ended_at(&self, now: u64) -> bool {
        self.expires_at <= now
    }

    /// Seconds left at `now` (0 once ended)
    pub const fn time_remaining_at(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    /// Decode the traded item.
    pub fn item(&self) -> AuctionResult<Item> {
        Item::from_cbor(&self.item_payload)
    }

    /// Move out of `Active`. Fails with `AlreadyFinal` if already terminal.
    pub(crate) fn finish(&mut self, status: ListingStatus) -> AuctionResult<()> {
        debug_assert!(status.is_final());
        if self.status.is_final() {
            return Err(AuctionError::AlreadyFinal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Smallest amount the next bid must reach.
    pub fn minimum_next_bid(&self) -> Option<f64> {
        match self.sale_type {
            SaleType::Bidding { starting_bid, .. } if self.current_owner_id == self.seller_id => {
                Some(starting_bid)
            }
            SaleType::Bidding { bid_increment, .. } => Some(self.current_price + bid_increment),
            SaleType::FixedPrice => None,
        }
    }

    /// Record a new highest bid. The price never decreases.
    pub(crate) fn raise_bid(&mut self, bidder: &str, amount: f64) -> AuctionResult<()> {
        if self.status.is_final() {
            return Err(AuctionError::AlreadyFinal {
                id: self.id.clone(),
                status: self.status,
            });
        }
        let minimum = self.minimum_next_bid().ok_or_else(|| {
            AuctionError::InvalidArgument(format!("listing {} does not accept bids", self.id))
        })?;
        if !amount.is_finite() || amount < minimum || amount < self.current_price {
            return Err(AuctionError::OutOfRange {
                field: Field::Bid,
                value: amount,
                min: minimum,
                max: f64::MAX,
            });
        }
        self.current_price = amount;
        self.current_owner_id = bidder.to_string();
        Ok(())
    }

    /// Serialize the listing to CBOR bytes
    pub fn to_cbor(&self) -> AuctionResult<Vec<u8>> {
        to_cbor(self)
    }

    /// Deserialize a listing from CBOR bytes
    pub fn from_cbor(data: &[u8]) -> AuctionResult<Self> {
        cbor_from_limited_reader(data, MAX_ITEM_PAYLOAD_SIZE * 2)
    }
}

/// Builder for creating new listings
pub struct ListingBuilder<T: TimeProvider> {
    time: T,
    id: Option<String>,
    seller: Option<String>,
    item_payload: Option<Vec<u8>>,
    category: Option<String>,
    base_price: Option<f64>,
    sale_type: SaleType,
    duration_secs: Option<u64>,
}

impl<T: TimeProvider> ListingBuilder<T> {
    /// Create a new builder with a time provider
    pub const fn new(time: T) -> Self {
        Self {
            time,
            id: None,
            seller: None,
            item_payload: None,
            category: None,
            base_price: None,
            sale_type: SaleType::FixedPrice,
            duration_secs: None,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = Some(seller.into());
        self
    }

    #[must_use]
    pub fn item_payload(mut self, payload: Vec<u8>) -> Self {
        self.item_payload = Some(payload);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn base_price(mut self, price: f64) -> Self {
        self.base_price = Some(price);
        self
    }

    /// Switch to bidding with the given opening bid and step
    #[must_use]
    pub const fn bidding(mut self, starting_bid: f64, bid_increment: f64) -> Self {
        self.sale_type = SaleType::Bidding {
            starting_bid,
            bid_increment,
        };
        self
    }

    /// Listing lifetime in seconds from now
    #[must_use]
    pub const fn duration(mut self, seconds: u64) -> Self {
        self.duration_secs = Some(seconds);
        self
    }

    /// Build the listing (returns error if required fields are missing)
    pub fn build(self) -> AuctionResult<Listing> {
        let missing = |name: &str| AuctionError::InvalidArgument(format!("{name} is required"));
        let created_at = self.time.now_unix();
        let seller = self.seller.ok_or_else(|| missing("seller"))?;
        let base_price = self.base_price.ok_or_else(|| missing("base_price"))?;
        let duration_secs = self.duration_secs.ok_or_else(|| missing("duration"))?;
        let current_price = match self.sale_type {
            SaleType::Bidding { starting_bid, .. } => starting_bid,
            SaleType::FixedPrice => base_price,
        };

        Ok(Listing {
            id: self.id.ok_or_else(|| missing("id"))?,
            current_owner_id: seller.clone(),
            seller_id: seller,
            item_payload: self.item_payload.ok_or_else(|| missing("item_payload"))?,
            category: self.category.ok_or_else(|| missing("category"))?,
            sale_type: self.sale_type,
            base_price,
            current_price,
            duration_secs,
            created_at,
            expires_at: created_at.saturating_add(duration_secs),
            status: ListingStatus::Active,
        })
    }
}
