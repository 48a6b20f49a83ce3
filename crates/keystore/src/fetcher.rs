use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::FetchError;

/// Abstract interface for retrieving the raw key set document.
///
/// Cancellation is applied by the caller, which drops the returned future;
/// implementations must not leave shared state behind when that happens.
#[async_trait]
pub trait JwksFetcher: Send + Sync {
    /// Fetch the current document.
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Fetches a key set over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url: Url,
    method: Method,
    expected_status: StatusCode,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// A fetcher issuing `GET url` and expecting `200 OK`.
    pub fn new(client: Client, url: Url) -> Self {
        Self {
            client,
            url,
            method: Method::GET,
            expected_status: StatusCode::OK,
            timeout: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_expected_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;
        self
    }

    /// Bounds every request, including reading the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl JwksFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.request(self.method.clone(), self.url.clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let status = response.status();
        if status != self.expected_status {
            return Err(FetchError::UnexpectedStatus {
                status,
                expected: self.expected_status,
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
