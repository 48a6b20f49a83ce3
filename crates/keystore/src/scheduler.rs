use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ErrorKind, RefreshErrorHandler, Storage};

/// Refreshes `storage` every `interval` until `cancel` fires.
///
/// The first refresh happens one `interval` after the call, since callers
/// load the initial set themselves. A failed cycle is logged, passed to
/// `on_error` and retried on the next tick; it never stops the task.
///
/// A zero `interval` disables background refresh: the returned task finishes
/// at once without refreshing.
pub fn spawn_refresh_task(
    storage: Arc<Storage>,
    interval: Duration,
    cancel: CancellationToken,
    on_error: Option<RefreshErrorHandler>,
) -> JoinHandle<()> {
    if interval.is_zero() {
        tracing::warn!("refresh interval is zero; background refresh disabled");
        return tokio::spawn(async {});
    }

    tracing::info!(?interval, "starting key set refresh task");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match storage.refresh(&cancel).await {
                Ok(outcome) => tracing::debug!(?outcome, "refresh cycle finished"),
                Err(err) if err.kind() == ErrorKind::Cancelled => break,
                Err(err) => {
                    tracing::warn!(error = %err, kind = ?err.kind(), "refresh cycle failed; keeping current key set");
                    if let Some(handler) = on_error.as_ref() {
                        handler(&err);
                    }
                }
            }
        }

        tracing::info!("key set refresh task stopped");
    })
}
