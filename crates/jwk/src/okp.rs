use serde::{Deserialize, Serialize};

use crate::{Bytes, Secret};

/// A CFRG-curve key pair (RFC 8037).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Okp {
    /// The CFRG curve.
    pub crv: OkpCurves,

    /// The public key.
    pub x: Bytes,

    /// The private key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<Secret>,
}

impl Okp {
    /// Returns the key without its private member.
    pub fn to_public(&self) -> Self {
        Self { d: None, ..self.clone() }
    }
}

/// The CFRG curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum OkpCurves {
    Ed25519,
    Ed448,
    X25519,
    X448,
}
