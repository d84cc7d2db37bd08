pub mod harness;

pub use harness::MarketHarness;
