pub mod listing;
pub mod registry;
pub mod sweeper;
pub mod transaction;
pub mod validator;

pub use listing::{Listing, ListingBuilder, ListingStatus, SaleType};
pub use registry::ListingRegistry;
pub use sweeper::spawn_expiry_sweeper;
pub use transaction::{SaleKind, Transaction};
pub use validator::{select_duration, DurationTier, ListingValidator, SellRequest};
