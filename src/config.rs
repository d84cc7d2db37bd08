//! Configuration for the auction house.
//!
//! Tunable constants live here as `pub const` items; operator-facing
//! knobs are grouped in [`AuctionConfig`], which loads from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuctionError, AuctionResult};
use crate::format::format_timestamp;

/// Environment variable naming a JSON config file.
pub const AUCTION_CONFIG_ENV: &str = "AUCTION_CONFIG";

/// Interval in seconds between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5;

/// Listing lifetime when the seller holds no duration tier (2 days).
pub const DEFAULT_DURATION_SECS: u64 = 172_800;

/// Maximum size of a CBOR item payload accepted for decoding.
pub const MAX_ITEM_PAYLOAD_SIZE: usize = 1 << 20;

/// Tag keys written onto a bundle carrier.
pub mod bundle_tags {
    /// Total number of embedded items.
    pub const COUNT: &str = "bundle-item-count";
    /// Prefix of the embedding-set identifier key; the identifier follows.
    pub const SET_PREFIX: &str = "bundle-set-";
    /// Prefix of each embedded entry; the zero-based index follows.
    pub const ITEM_PREFIX: &str = "bundle-item-";
    /// Marks the carrier as enchanted-looking.
    pub const GLOW: &str = "glow";
}

/// How a bundle carrier item looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub material: String,
    /// Display name; `%item_name%` is replaced with the base item's name.
    pub name: String,
    pub lore: Vec<String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            material: "CHEST".to_string(),
            name: "&e%item_name% Bundle".to_string(),
            lore: vec!["&7Contains multiple items".to_string()],
        }
    }
}

/// Listing policy and runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    pub min_base_price: f64,
    pub max_base_price: f64,
    pub min_starting_bid: f64,
    pub max_starting_bid: f64,
    pub min_bid_increment: f64,
    pub max_bid_increment: f64,
    pub default_duration_secs: u64,
    /// `"tier:duration"` pairs; the duration is seconds or a string like `7d`.
    pub duration_tiers: Vec<String>,
    pub blocked_categories: Vec<String>,
    /// Maximum concurrent ACTIVE listings per seller.
    pub sell_limit: usize,
    pub use_alternate_currency_format: bool,
    pub sweep_interval_secs: u64,
    /// strftime pattern for rendering timestamps.
    pub date_format: String,
    pub bundle: BundleConfig,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            min_base_price: 1.0,
            max_base_price: 1_000_000_000.0,
            min_starting_bid: 1.0,
            max_starting_bid: 1_000_000_000.0,
            min_bid_increment: 1.0,
            max_bid_increment: 1_000_000_000.0,
            default_duration_secs: DEFAULT_DURATION_SECS,
            duration_tiers: Vec::new(),
            blocked_categories: Vec::new(),
            sell_limit: 45,
            use_alternate_currency_format: false,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            bundle: BundleConfig::default(),
        }
    }
}

impl AuctionConfig {
    /// Parse a config from JSON text and validate it.
    pub fn from_json(text: &str) -> AuctionResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| AuctionError::Config(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> AuctionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AuctionError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Load from the file named by `AUCTION_CONFIG`, or defaults when unset.
    pub fn from_env() -> AuctionResult<Self> {
        match std::env::var(AUCTION_CONFIG_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Reject inverted bounds, a zero sell limit and a broken date format.
    pub fn validate(&self) -> AuctionResult<()> {
        let bounds = [
            ("base price", self.min_base_price, self.max_base_price),
            ("starting bid", self.min_starting_bid, self.max_starting_bid),
            ("bid increment", self.min_bid_increment, self.max_bid_increment),
        ];
        for (name, min, max) in bounds {
            if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
                return Err(AuctionError::Config(format!(
                    "{name} bounds are invalid: min {min}, max {max}"
                )));
            }
        }
        if self.sell_limit == 0 {
            return Err(AuctionError::Config("sell_limit must be at least 1".into()));
        }
        if format_timestamp(0, &self.date_format).is_err() {
            return Err(AuctionError::Config(format!(
                "date_format '{}' is not a valid strftime pattern",
                self.date_format
            )));
        }
        if self.sweep_interval_secs == 0 {
            return Err(AuctionError::Config(
                "sweep_interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Render a Unix timestamp in seconds with `date_format`.
    pub fn format_date(&self, unix_secs: u64) -> AuctionResult<String> {
        format_timestamp(unix_secs.saturating_mul(1000), &self.date_format)
    }

    pub fn is_blocked(&self, category: &str) -> bool {
        self.blocked_categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }
}
