//! Market test harness.
//!
//! Wires a validator and registry to a shared mock clock and RNG.

use std::sync::Arc;

use auction_house::mocks::{MockRandom, MockTime};
use auction_house::{
    AuctionConfig, AuctionResult, Item, Listing, ListingRegistry, ListingValidator, SellRequest,
};

pub struct MarketHarness {
    pub time: MockTime,
    pub rng: MockRandom,
    pub registry: Arc<ListingRegistry<MockTime>>,
    pub validator: ListingValidator<MockTime, MockRandom>,
}

#[allow(dead_code)]
impl MarketHarness {
    pub fn new() -> Self {
        Self::with_config(AuctionConfig::default())
    }

    pub fn with_config(config: AuctionConfig) -> Self {
        let time = MockTime::new(1_000);
        let rng = MockRandom::default_seed();
        let registry = Arc::new(ListingRegistry::with_time(config.sell_limit, time.clone()));
        let validator = ListingValidator::new(config, time.clone(), rng.clone()).unwrap();
        Self {
            time,
            rng,
            registry,
            validator,
        }
    }

    /// A fixed-price request for a stack of diamonds.
    pub fn request(&self, seller: &str, base_price: &str) -> SellRequest {
        SellRequest {
            seller: seller.to_string(),
            item_payload: Item::new("DIAMOND", 8).to_cbor().unwrap(),
            category: "MINERALS".to_string(),
            base_price: base_price.to_string(),
            starting_bid: None,
            bid_increment: None,
            duration_tiers: Vec::new(),
        }
    }

    pub fn bidding_request(&self, seller: &str, base: &str, start: &str, step: &str) -> SellRequest {
        SellRequest {
            starting_bid: Some(start.to_string()),
            bid_increment: Some(step.to_string()),
            ..self.request(seller, base)
        }
    }

    /// Validate and register in one step, as a sell command does.
    pub fn submit(&self, request: &SellRequest) -> AuctionResult<Listing> {
        let listing = self.validator.validate(request, &*self.registry)?;
        self.registry.add(listing.clone())?;
        Ok(listing)
    }

    pub fn sell(&self, seller: &str, base_price: &str) -> Listing {
        self.submit(&self.request(seller, base_price)).unwrap()
    }

    pub fn advance(&self, secs: u64) {
        self.time.advance(secs);
    }
}
