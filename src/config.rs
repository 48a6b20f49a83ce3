use std::{str::FromStr, time::Duration};

use eyre::{eyre, Result, WrapErr};
use keystore::HttpStorageOptions;
use reqwest::StatusCode;
use url::Url;

/// Start-up configuration read from `JWKS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: Url,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub expected_status: StatusCode,
    pub initial_fetch_retries: usize,
    pub allow_empty_start: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("JWKS_URL").ok_or_else(|| eyre!("JWKS_URL env variable required"))?;
        let url = Url::parse(&url).wrap_err("JWKS_URL is not a valid URL")?;

        let refresh_interval = parse_or(&lookup, "JWKS_REFRESH_INTERVAL_SECS", 300u64)?;
        if refresh_interval == 0 {
            return Err(eyre!("JWKS_REFRESH_INTERVAL_SECS must be greater than zero"));
        }
        let http_timeout = parse_or(&lookup, "JWKS_HTTP_TIMEOUT_SECS", 10u64)?;
        let expected_status = parse_or(&lookup, "JWKS_EXPECTED_STATUS", 200u16)?;
        let expected_status = StatusCode::from_u16(expected_status)
            .wrap_err("JWKS_EXPECTED_STATUS is not an HTTP status code")?;

        Ok(Self {
            url,
            refresh_interval: Duration::from_secs(refresh_interval),
            http_timeout: Duration::from_secs(http_timeout),
            expected_status,
            initial_fetch_retries: parse_or(&lookup, "JWKS_INITIAL_FETCH_RETRIES", 3)?,
            allow_empty_start: parse_or(&lookup, "JWKS_ALLOW_EMPTY_START", false)?,
        })
    }

    pub fn storage_options(&self) -> HttpStorageOptions {
        HttpStorageOptions {
            expected_status: self.expected_status,
            no_error_return_first_request: self.allow_empty_start,
            initial_fetch_retries: self.initial_fetch_retries,
            ..Default::default()
        }
        .http_timeout(self.http_timeout)
        .refresh_interval(self.refresh_interval)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .wrap_err_with(|| format!("invalid value {value:?} for {name}")),
        None => Ok(default),
    }
}
