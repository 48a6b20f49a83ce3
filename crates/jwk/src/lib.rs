//! Typed JSON Web Keys as defined in [RFC 7517].
//!
//! Key material is modelled as a tagged variant over the supported key types,
//! decided once at parse time, so the rest of the key cache never handles
//! untyped payloads.
//!
//! ## Modules
//!
//! - [`bytes`]:  base64url encoded binary members.
//! - [`ec`]:     elliptic-curve keys (`"kty": "EC"`).
//! - [`jwk`]:    the [`Jwk`] and [`JwkSet`] documents.
//! - [`key`]:    the [`Key`] variant selected by `kty`.
//! - [`oct`]:    symmetric octet keys (`"kty": "oct"`).
//! - [`okp`]:    CFRG octet key pairs (`"kty": "OKP"`).
//! - [`prm`]:    parameters shared by every key type.
//! - [`rsa`]:    RSA keys (`"kty": "RSA"`).
//! - [`secret`]: private members that are zeroized on drop and redacted in logs.
//!
//! [RFC 7517]: https://datatracker.ietf.org/doc/html/rfc7517

mod bytes;
mod ec;
mod jwk;
mod key;
mod oct;
mod okp;
mod prm;
mod rsa;
mod secret;

// Re-exports
pub use bytes::Bytes;
pub use ec::{Ec, EcCurves};
pub use jwk::{Jwk, JwkSet};
pub use key::Key;
pub use oct::Oct;
pub use okp::{Okp, OkpCurves};
pub use prm::{Algorithm, Class, Operations, Parameters, Signing};
pub use rsa::Rsa;
pub use secret::Secret;
