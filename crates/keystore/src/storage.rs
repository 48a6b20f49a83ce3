use std::sync::Arc;

use jwk::JwkSet;
use parking_lot::Mutex;
use retry_util::{retry_async_operation_if, RetryOptions};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    scheduler::spawn_refresh_task, ActiveKeySet, Error, ErrorKind, HttpFetcher,
    HttpStorageOptions, JwksFetcher, KeyRecord, KeySet, KeySetChanges, KeySetParser, Refresher,
};

/// Result of a call to [`Storage::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new key set was published.
    Refreshed {
        keys: usize,
        changes: KeySetChanges,
    },
    /// Another refresh was already in flight; nothing was done.
    Skipped,
}

/// Serves the active key set and refreshes it from a remote source.
///
/// Reads never wait on a refresh: a refresh fetches and builds the new set
/// without touching the active one, then publishes it in one step. All
/// mutation is set-level and goes through [`Storage::refresh`].
pub struct Storage {
    active: ActiveKeySet,
    refresher: Refresher,
    fetcher: Arc<dyn JwksFetcher>,
    refreshing: tokio::sync::Mutex<()>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Storage {
    /// Creates a storage with an empty active set and the JWKS parser.
    pub fn new<F>(fetcher: F) -> Self
    where
        F: JwksFetcher + 'static,
    {
        Self {
            active: ActiveKeySet::default(),
            refresher: Refresher::default(),
            fetcher: Arc::new(fetcher),
            refreshing: tokio::sync::Mutex::new(()),
            refresh_task: Mutex::new(None),
        }
    }

    /// Replaces the parser collaborator.
    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: KeySetParser + 'static,
    {
        self.refresher = Refresher::new(Arc::new(parser));
        self
    }

    /// Builds a storage that fetches from `url`, loads the initial key set
    /// and, when `options.refresh_interval` is set and non-zero, keeps it
    /// refreshed in the background until `cancel` fires.
    ///
    /// The background task holds a reference to the storage, so it stays
    /// alive until `cancel` fires. Use [`Storage::take_refresh_task`] to wait
    /// for the task to stop.
    ///
    /// The initial fetch is retried `options.initial_fetch_retries` times. If
    /// it still fails, the error is returned unless
    /// `options.no_error_return_first_request` is set, in which case the
    /// storage starts empty.
    pub async fn from_http(
        url: Url,
        options: HttpStorageOptions,
        cancel: CancellationToken,
    ) -> Result<Arc<Self>, Error> {
        let client = options.client.clone().unwrap_or_default();
        let fetcher = HttpFetcher::new(client, url.clone())
            .with_method(options.method.clone())
            .with_expected_status(options.expected_status)
            .with_timeout(options.http_timeout);
        let storage = Arc::new(Self::new(fetcher));

        let retry = RetryOptions::new().retries(options.initial_fetch_retries);
        let initial = retry_async_operation_if(
            || storage.refresh(&cancel),
            retry,
            |err: &Error| err.kind() != ErrorKind::Cancelled,
        )
        .await;

        match initial {
            Ok(outcome) => tracing::debug!(%url, ?outcome, "initial key set loaded"),
            Err(err) if options.no_error_return_first_request => {
                tracing::warn!(%url, error = %err, "initial key set fetch failed; starting empty");
            }
            Err(err) => return Err(err),
        }

        match options.refresh_interval {
            Some(interval) if !interval.is_zero() => {
                let task = spawn_refresh_task(
                    Arc::clone(&storage),
                    interval,
                    cancel,
                    options.refresh_error_handler.clone(),
                );
                *storage.refresh_task.lock() = Some(task);
            }
            Some(_) => tracing::debug!(%url, "zero refresh interval; background refresh disabled"),
            None => {}
        }

        Ok(storage)
    }

    /// Hands out the background refresh task started by
    /// [`Storage::from_http`], if any. Later calls return `None`.
    pub fn take_refresh_task(&self) -> Option<JoinHandle<()>> {
        self.refresh_task.lock().take()
    }

    /// Returns the record bound to `kid` in the active set.
    ///
    /// Fails with [`ErrorKind::NotFound`] for unknown identifiers.
    pub fn key_read(&self, kid: &str) -> Result<Arc<KeyRecord>, Error> {
        self.active.load().lookup(kid).ok_or_else(|| Error::not_found(kid))
    }

    /// Returns every record of the active set.
    pub fn key_read_all(&self) -> Vec<Arc<KeyRecord>> {
        self.active.load().all()
    }

    /// Returns the active set itself, for several lookups against one
    /// consistent snapshot.
    pub fn snapshot(&self) -> Arc<KeySet> {
        self.active.load()
    }

    /// Public form of the active set, suitable for re-publishing.
    ///
    /// Private members are removed and symmetric keys are left out.
    pub fn marshal(&self) -> JwkSet {
        let keys = self
            .active
            .load()
            .iter()
            .filter_map(|record| record.jwk().to_public())
            .collect();
        JwkSet { keys }
    }

    /// Fetches, parses and publishes a new key set.
    ///
    /// Runs `Fetching -> Parsing -> Swapping`. Any error or a cancellation
    /// before the swap returns early with the active set untouched; once the
    /// swap is done cancellation has no effect. A call made while another
    /// refresh is in flight returns [`RefreshOutcome::Skipped`].
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<RefreshOutcome, Error> {
        let Ok(_refreshing) = self.refreshing.try_lock() else {
            tracing::debug!("refresh already in flight; skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        tracing::trace!("fetching key set");
        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(Error::msg(ErrorKind::Cancelled, "refresh cancelled while fetching"));
            }
            fetched = self.fetcher.fetch() => fetched?,
        };

        tracing::trace!(bytes = raw.len(), "parsing key set");
        let candidate = self.refresher.parse(&raw)?;

        if cancel.is_cancelled() {
            return Err(Error::msg(ErrorKind::Cancelled, "refresh cancelled before swap"));
        }

        let candidate = Arc::new(candidate);
        let previous = self.refresher.swap(&self.active, Arc::clone(&candidate));
        let keys = candidate.len();
        let changes = previous.changes(&candidate);
        tracing::info!(
            keys,
            added = changes.added,
            removed = changes.removed,
            "key set refreshed"
        );

        Ok(RefreshOutcome::Refreshed { keys, changes })
    }

    /// Inserts or replaces one record.
    ///
    /// Debugging aid only. The whole set is copied, modified and published
    /// in one step, exactly like a refresh.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn key_write(&self, record: KeyRecord) {
        self.active
            .update(|current| Some(current.with_record(record.clone())));
    }

    /// Removes one record; returns whether it was present.
    ///
    /// Debugging aid only, see [`Storage::key_write`].
    #[cfg(any(test, feature = "test-utils"))]
    pub fn key_delete(&self, kid: &str) -> bool {
        let mut removed = false;
        self.active.update(|current| {
            let next = current.without(kid);
            removed = next.is_some();
            next
        });
        removed
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("keys", &self.active.load().len())
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}
