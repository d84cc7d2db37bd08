use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::registry::ListingRegistry;
use crate::traits::TimeProvider;

/// Start a background task that expires overdue listings every `interval`.
///
/// The task stops when `shutdown` is cancelled. Listings settled between
/// ticks are skipped by the sweep, so a late tick never overrides a sale.
pub fn spawn_expiry_sweeper<T>(
    registry: Arc<ListingRegistry<T>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    T: TimeProvider + 'static,
{
    info!("Starting expiry sweeper every {:?}", interval);
    tokio::spawn(async move {
        let mut tick_count: u64 = 0;
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("Expiry sweeper shutting down");
                    break;
                }
                () = tokio::time::sleep(interval) => {}
            }
            tick_count = tick_count.wrapping_add(1);

            let expired = registry.sweep_expired();
            if !expired.is_empty() {
                debug!("Sweep tick {} expired {:?}", tick_count, expired);
            }
        }
    })
}
