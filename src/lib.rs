//! Daemon wiring for the `keystore` JWKS cache.

pub mod config;

pub use config::Config;
