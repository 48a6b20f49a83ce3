use std::{fmt, sync::Arc, time::Duration};

use reqwest::{Client, Method, StatusCode};

use crate::Error;

/// Called with every error of a background refresh cycle.
pub type RefreshErrorHandler = Arc<dyn Fn(&Error) + Send + Sync>;

/// Options for [`Storage::from_http`](crate::Storage::from_http).
#[derive(Clone)]
pub struct HttpStorageOptions {
    /// HTTP client to use. A default client is built when absent.
    pub client: Option<Client>,
    /// Request method, `GET` by default.
    pub method: Method,
    /// The only status accepted as a successful fetch, `200 OK` by default.
    pub expected_status: StatusCode,
    /// Upper bound for a single request.
    pub http_timeout: Duration,
    /// Interval of the background refresh. `None` or zero disables it.
    pub refresh_interval: Option<Duration>,
    /// Receives errors of background refresh cycles.
    pub refresh_error_handler: Option<RefreshErrorHandler>,
    /// Start with an empty key set instead of failing when the initial
    /// fetch does not succeed.
    pub no_error_return_first_request: bool,
    /// Additional attempts for the initial fetch.
    pub initial_fetch_retries: usize,
}

impl HttpStorageOptions {
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn on_refresh_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.refresh_error_handler = Some(Arc::new(handler));
        self
    }
}

impl Default for HttpStorageOptions {
    fn default() -> Self {
        Self {
            client: None,
            method: Method::GET,
            expected_status: StatusCode::OK,
            http_timeout: Duration::from_secs(10),
            refresh_interval: None,
            refresh_error_handler: None,
            no_error_return_first_request: false,
            initial_fetch_retries: 0,
        }
    }
}

impl fmt::Debug for HttpStorageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStorageOptions")
            .field("method", &self.method)
            .field("expected_status", &self.expected_status)
            .field("http_timeout", &self.http_timeout)
            .field("refresh_interval", &self.refresh_interval)
            .field("refresh_error_handler", &self.refresh_error_handler.is_some())
            .field("no_error_return_first_request", &self.no_error_return_first_request)
            .field("initial_fetch_retries", &self.initial_fetch_retries)
            .finish_non_exhaustive()
    }
}
