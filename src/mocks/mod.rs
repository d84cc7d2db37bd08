//! Deterministic clocks and randomness for tests.

pub mod random;
pub mod time;

pub use random::MockRandom;
pub use time::MockTime;
