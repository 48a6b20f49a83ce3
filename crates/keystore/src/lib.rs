//! A JSON Web Key Set cache refreshed from a remote source.
//!
//! The [`Storage`] serves lookups by `kid` from the active [`KeySet`] while
//! [`Storage::refresh`] replaces that set. Refreshes build the complete new
//! set first and then publish it with one handle replacement, so a reader
//! sees either the previous set or the new one. A revoked key cannot stay
//! resolvable next to its replacements, and keys present in both sets never
//! disappear mid-refresh.
//!
//! ```no_run
//! # use keystore::{HttpStorageOptions, Storage};
//! # use std::time::Duration;
//! # use tokio_util::sync::CancellationToken;
//! # async fn run() -> Result<(), keystore::Error> {
//! let cancel = CancellationToken::new();
//! let url = "https://issuer.example/.well-known/jwks.json".parse().unwrap();
//! let options = HttpStorageOptions::default().refresh_interval(Duration::from_secs(300));
//!
//! let storage = Storage::from_http(url, options, cancel.clone()).await?;
//! let record = storage.key_read("2011-04-29")?;
//! println!("{} is a {} key", record.kid(), record.key().kty());
//! # Ok(())
//! # }
//! ```

mod active;
mod error;
mod fetcher;
mod keyset;
mod options;
mod parser;
mod record;
mod refresher;
mod scheduler;
mod storage;


pub use active::ActiveKeySet;
pub use error::{Error, ErrorKind, FetchError};
pub use fetcher::{HttpFetcher, JwksFetcher};
pub use keyset::{KeySet, KeySetChanges};
pub use options::{HttpStorageOptions, RefreshErrorHandler};
pub use parser::{JwksParser, KeySetParser};
pub use record::KeyRecord;
pub use refresher::Refresher;
pub use scheduler::spawn_refresh_task;
pub use storage::{RefreshOutcome, Storage};
