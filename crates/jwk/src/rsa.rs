use serde::{Deserialize, Serialize};

use crate::{Bytes, Secret};

/// An RSA key.
///
/// The private members are all optional; a public key carries `n` and `e` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsa {
    /// The modulus.
    pub n: Bytes,

    /// The public exponent.
    pub e: Bytes,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<Secret>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub p: Option<Secret>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub q: Option<Secret>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dp: Option<Secret>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dq: Option<Secret>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub qi: Option<Secret>,
}

impl Rsa {
    /// Whether any private member is present.
    pub fn is_private(&self) -> bool {
        self.d.is_some()
            || self.p.is_some()
            || self.q.is_some()
            || self.dp.is_some()
            || self.dq.is_some()
            || self.qi.is_some()
    }

    /// Returns the key reduced to `n` and `e`.
    pub fn to_public(&self) -> Self {
        Self {
            n: self.n.clone(),
            e: self.e.clone(),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        }
    }
}
