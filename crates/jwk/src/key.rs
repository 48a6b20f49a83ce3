use serde::{Deserialize, Serialize};

use crate::{ec::Ec, oct::Oct, okp::Okp, rsa::Rsa};

/// A key type that can be contained in a JWK.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", tag = "kty")]
#[non_exhaustive]
pub enum Key {
    /// An elliptic-curve key.
    Ec(Ec),

    /// An RSA key.
    Rsa(Rsa),

    /// A symmetric key.
    #[serde(rename = "oct")]
    Oct(Oct),

    /// A CFRG-curve key.
    Okp(Okp),
}

impl Key {
    /// The `kty` values understood by [`Key`].
    pub const SUPPORTED_TYPES: [&'static str; 4] = ["EC", "RSA", "oct", "OKP"];

    /// Whether `kty` names a key type this crate can represent.
    pub fn is_supported_type(kty: &str) -> bool {
        Self::SUPPORTED_TYPES.contains(&kty)
    }

    /// The `kty` value of this key.
    pub fn kty(&self) -> &'static str {
        match self {
            Key::Ec(_) => "EC",
            Key::Rsa(_) => "RSA",
            Key::Oct(_) => "oct",
            Key::Okp(_) => "OKP",
        }
    }

    /// Whether the key carries private material.
    ///
    /// Symmetric keys are always private.
    pub fn is_private(&self) -> bool {
        match self {
            Key::Ec(ec) => ec.d.is_some(),
            Key::Rsa(rsa) => rsa.is_private(),
            Key::Oct(_) => true,
            Key::Okp(okp) => okp.d.is_some(),
        }
    }

    /// Returns the public half of the key, or `None` for symmetric keys.
    pub fn to_public(&self) -> Option<Key> {
        match self {
            Key::Ec(ec) => Some(Key::Ec(ec.to_public())),
            Key::Rsa(rsa) => Some(Key::Rsa(rsa.to_public())),
            Key::Oct(_) => None,
            Key::Okp(okp) => Some(Key::Okp(okp.to_public())),
        }
    }
}

impl From<Ec> for Key {
    #[inline(always)]
    fn from(key: Ec) -> Self {
        Self::Ec(key)
    }
}

impl From<Rsa> for Key {
    #[inline(always)]
    fn from(key: Rsa) -> Self {
        Self::Rsa(key)
    }
}

impl From<Oct> for Key {
    #[inline(always)]
    fn from(key: Oct) -> Self {
        Self::Oct(key)
    }
}

impl From<Okp> for Key {
    #[inline(always)]
    fn from(key: Okp) -> Self {
        Self::Okp(key)
    }
}
