//! Randomness used for listing ids and bundle provenance markers.

use rand::RngCore;

/// Source of random bytes.
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]);

    /// 16 random bytes, hex-encoded. Used wherever a globally unique
    /// identifier is needed.
    fn unique_id(&self) -> String {
        let mut bytes = [0u8; 16];
        self.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRng;

impl ThreadRng {
    pub const fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRng {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}
