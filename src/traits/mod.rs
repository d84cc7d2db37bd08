//! Trait abstractions for dependency injection and testability.
//!
//! Clocks, randomness and item containers are supplied by the host; these
//! traits let the core run against deterministic stand-ins in tests.

pub mod container;
pub mod random;
pub mod time;

pub use container::ItemContainer;
pub use random::{RandomSource, ThreadRng};
pub use time::{SystemTimeProvider, TimeProvider};
