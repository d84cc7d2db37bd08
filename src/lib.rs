//! Core of a timed player marketplace: sell-request validation, the
//! listing registry with its expiry sweep, item bundles and the
//! formatting helpers shown to players.

pub mod bundle;
pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod item;
pub mod marketplace;
pub mod traits;
pub mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use bundle::{create_bundle, is_bundle, pack, unpack};
pub use config::{AuctionConfig, BundleConfig};
pub use error::{AuctionError, AuctionResult, Field};
pub use item::{Item, TagValue};
pub use marketplace::{
    spawn_expiry_sweeper, Listing, ListingRegistry, ListingStatus, ListingValidator, SaleKind,
    SaleType, SellRequest, Transaction,
};
pub use traits::{ItemContainer, RandomSource, SystemTimeProvider, ThreadRng, TimeProvider};
