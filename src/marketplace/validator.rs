//! Sell-request validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! empty item, blocked category, seller limit, number parsing, base price range,
//! bidding ranges and cross-checks, then duration selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::listing::Listing;
use super::registry::ListingRegistry;
use crate::config::AuctionConfig;
use crate::error::{AuctionError, AuctionResult, Field};
use crate::format::{is_valid_duration, seconds_from_str};
use crate::item::Item;
use crate::traits::{RandomSource, TimeProvider};

/// A proposed listing, with prices still in their raw text form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellRequest {
    pub seller: String,
    /// CBOR-encoded item
    pub item_payload: Vec<u8>,
    pub category: String,
    pub base_price: String,
    #[serde(default)]
    pub starting_bid: Option<String>,
    #[serde(default)]
    pub bid_increment: Option<String>,
    /// `"tier:duration"` entries the seller is permitted
    #[serde(default)]
    pub duration_tiers: Vec<String>,
}

/// A named listing lifetime granted by a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationTier {
    pub name: String,
    pub seconds: u64,
}

impl FromStr for DurationTier {
    type Err = AuctionError;

    /// Parse `name:seconds` or `name:<duration string>` (e.g. `vip:7d`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once(':')
            .ok_or_else(|| AuctionError::InvalidArgument(format!("tier '{s}' has no ':'")))?;
        let value = value.trim();
        let seconds = if is_valid_duration(value) {
            seconds_from_str(value)
        } else {
            value.parse::<u64>().map_err(|e| {
                AuctionError::InvalidArgument(format!("tier '{s}' has a bad duration: {e}"))
            })?
        };
        Ok(Self {
            name: name.trim().to_string(),
            seconds,
        })
    }
}

/// Longest permitted tier, or `default` when none parse.
pub fn select_duration<S: AsRef<str>>(tiers: &[S], default: u64) -> u64 {
    tiers
        .iter()
        .filter_map(|raw| match raw.as_ref().parse::<DurationTier>() {
            Ok(tier) => Some(tier.seconds),
            Err(e) => {
                warn!("Ignoring duration tier: {}", e);
                None
            }
        })
        .max()
        .unwrap_or(default)
}

fn parse_number(field: Field, raw: &str) -> AuctionResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AuctionError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

fn check_range(field: Field, value: f64, min: f64, max: f64) -> AuctionResult<()> {
    if value < min || value > max {
        return Err(AuctionError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Turns sell requests into ACTIVE listing drafts.
pub struct ListingValidator<T: TimeProvider, R: RandomSource> {
    config: AuctionConfig,
    time: T,
    rng: R,
}

impl<T: TimeProvider, R: RandomSource> ListingValidator<T, R> {
    /// Fails with `Config` when the bounds in `config` are unusable.
    pub fn new(config: AuctionConfig, time: T, rng: R) -> AuctionResult<Self> {
        config.validate()?;
        Ok(Self { config, time, rng })
    }

    pub const fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// Validate `request` and build the listing it describes.
    ///
    /// The registry is only read; registering the draft is the caller's
    /// next step and re-checks the seller limit atomically.
    pub fn validate<C: TimeProvider>(
        &self,
        request: &SellRequest,
        registry: &ListingRegistry<C>,
    ) -> AuctionResult<Listing> {
        let result = self.check(request, registry);
        if let Err(e) = &result {
            debug!("Rejected listing from {}: {}", request.seller, e);
        }
        result
    }

    fn check<C: TimeProvider>(
        &self,
        request: &SellRequest,
        registry: &ListingRegistry<C>,
    ) -> AuctionResult<Listing> {
        let cfg = &self.config;

        let item = Item::from_cbor(&request.item_payload)?;
        if item.is_air() {
            return Err(AuctionError::EmptyItem {
                material: item.material,
                amount: item.amount,
            });
        }

        if cfg.is_blocked(&request.category) {
            return Err(AuctionError::Blocked {
                category: request.category.clone(),
            });
        }

        if registry.is_at_limit(&request.seller) {
            return Err(AuctionError::LimitReached {
                seller: request.seller.clone(),
                limit: registry.sell_limit(),
            });
        }

        let bidding = match (&request.starting_bid, &request.bid_increment) {
            (None, None) => None,
            (Some(start), Some(step)) => Some((start.as_str(), step.as_str())),
            _ => {
                return Err(AuctionError::InvalidArgument(
                    "bidding needs both a starting bid and a bid increment".into(),
                ))
            }
        };

        let base_price = parse_number(Field::BasePrice, &request.base_price)?;
        let bid_terms = bidding
            .map(|(start, step)| {
                Ok::<_, AuctionError>((
                    parse_number(Field::StartingBid, start)?,
                    parse_number(Field::BidIncrement, step)?,
                ))
            })
            .transpose()?;

        check_range(
            Field::BasePrice,
            base_price,
            cfg.min_base_price,
            cfg.max_base_price,
        )?;

        if let Some((starting_bid, bid_increment)) = bid_terms {
            check_range(
                Field::StartingBid,
                starting_bid,
                cfg.min_starting_bid,
                cfg.max_starting_bid,
            )?;
            check_range(
                Field::BidIncrement,
                bid_increment,
                cfg.min_bid_increment,
                cfg.max_bid_increment,
            )?;

            if bid_increment <= 0.0 {
                return Err(AuctionError::OutOfRange {
                    field: Field::BidIncrement,
                    value: bid_increment,
                    min: f64::MIN_POSITIVE,
                    max: cfg.max_bid_increment,
                });
            }
            if starting_bid > base_price {
                return Err(AuctionError::OutOfRange {
                    field: Field::StartingBid,
                    value: starting_bid,
                    min: cfg.min_starting_bid,
                    max: base_price,
                });
            }
        }

        let duration = select_duration(&request.duration_tiers, cfg.default_duration_secs);

        let mut builder = Listing::builder_with_time(&self.time)
            .id(self.rng.unique_id())
            .seller(request.seller.clone())
            .item_payload(request.item_payload.clone())
            .category(request.category.clone())
            .base_price(base_price)
            .duration(duration);
        if let Some((starting_bid, bid_increment)) = bid_terms {
            builder = builder.bidding(starting_bid, bid_increment);
        }
        builder.build()
    }
}
