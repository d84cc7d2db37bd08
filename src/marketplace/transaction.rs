use serde::{Deserialize, Serialize};

/// How a sold listing was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleKind {
    /// Paid the buy-now price
    ImmediateBuy,
    /// Highest bidder when the sale was settled
    BidWin,
}

/// A completed sale, kept for the buyer's and seller's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub listing_id: String,
    pub seller: String,
    pub buyer: String,
    pub final_price: f64,
    pub sale_kind: SaleKind,
    pub sold_at: u64,
}

impl Transaction {
    pub fn involves(&self, player: &str) -> bool {
        self.seller == player || self.buyer == player
    }
}
