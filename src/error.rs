use std::fmt;

use crate::marketplace::ListingStatus;

/// Price field named in a rejection, so callers can template a message for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Field {
    BasePrice,
    StartingBid,
    BidIncrement,
    Bid,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BasePrice => "basePrice",
            Self::StartingBid => "startingBid",
            Self::BidIncrement => "bidIncrement",
            Self::Bid => "bid",
        };
        f.write_str(name)
    }
}

/// Domain-specific error types for the auction house library.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("{field} is not a number: '{value}'")]
    NotANumber { field: Field, value: String },

    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("cannot list an empty item ({material} x{amount})")]
    EmptyItem { material: String, amount: u32 },

    #[error("items of category '{category}' cannot be listed")]
    Blocked { category: String },

    #[error("seller {seller} already has {limit} active listings")]
    LimitReached { seller: String, limit: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("bundle entry {index} is unusable: {reason}")]
    CorruptBundle { index: usize, reason: String },

    #[error("listing {id} is already {status:?}")]
    AlreadyFinal { id: String, status: ListingStatus },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuctionError {
    /// The offending price field, for rejections that carry one.
    pub const fn field(&self) -> Option<Field> {
        match self {
            Self::NotANumber { field, .. } | Self::OutOfRange { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Whether the user can fix this by re-entering input.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::CorruptBundle { .. } | Self::Serialization(_) | Self::Config(_)
        )
    }
}

/// Convenience type alias.
pub type AuctionResult<T> = Result<T, AuctionError>;
