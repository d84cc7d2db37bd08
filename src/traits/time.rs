//! Clock abstraction for listing creation and expiry.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current Unix time.
pub trait TimeProvider: Send + Sync {
    /// Current Unix timestamp in seconds.
    fn now_unix(&self) -> u64;

    /// Current Unix timestamp in milliseconds.
    fn now_millis(&self) -> u64 {
        self.now_unix().saturating_mul(1000)
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub const fn new() -> Self {
        Self
    }

    fn since_epoch() -> std::time::Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_unix(&self) -> u64 {
        Self::since_epoch().as_secs()
    }

    fn now_millis(&self) -> u64 {
        u64::try_from(Self::since_epoch().as_millis()).unwrap_or(u64::MAX)
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_unix(&self) -> u64 {
        (**self).now_unix()
    }

    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for std::sync::Arc<T> {
    fn now_unix(&self) -> u64 {
        (**self).now_unix()
    }

    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}
