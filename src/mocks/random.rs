//! Reproducible byte stream standing in for the thread RNG.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::traits::RandomSource;

/// SplitMix64 stream; clones share position so ids stay unique across them.
#[derive(Debug, Clone)]
pub struct MockRandom {
    state: Arc<AtomicU64>,
}

impl MockRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            state: Arc::new(AtomicU64::new(seed)),
        }
    }

    pub fn default_seed() -> Self {
        Self::new(0x5EED)
    }

    fn next_u64(&self) -> u64 {
        let mut z = self
            .state
            .fetch_add(0x9E37_79B9_7F4A_7C15, Ordering::SeqCst)
            .wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl Default for MockRandom {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl RandomSource for MockRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_ids() {
        let a = MockRandom::new(7);
        let b = MockRandom::new(7);
        assert_eq!(a.unique_id(), b.unique_id());
    }

    #[test]
    fn test_successive_ids_differ() {
        let rng = MockRandom::default_seed();
        assert_ne!(rng.unique_id(), rng.unique_id());
    }
}
