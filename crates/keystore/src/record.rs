use jwk::{Jwk, Key, Parameters};

/// One key identifier bound to its key material.
///
/// Records are immutable once built; a refresh replaces whole sets of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    kid: String,
    jwk: Jwk,
}

impl KeyRecord {
    /// Binds `jwk` to `kid`.
    ///
    /// The `kid` parameter of the stored JWK is set to `kid` so that the
    /// record and its key material never disagree.
    pub fn new(kid: impl Into<String>, mut jwk: Jwk) -> Self {
        let kid = kid.into();
        jwk.prm.kid = Some(kid.clone());
        Self { kid, jwk }
    }

    /// Builds a record from a JWK that carries its own `kid`.
    pub fn from_jwk(jwk: Jwk) -> Option<Self> {
        let kid = jwk.prm.kid.clone()?;
        Some(Self { kid, jwk })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The typed key material.
    pub fn key(&self) -> &Key {
        &self.jwk.key
    }

    /// Metadata such as `alg` and `use`.
    pub fn parameters(&self) -> &Parameters {
        &self.jwk.prm
    }

    pub fn jwk(&self) -> &Jwk {
        &self.jwk
    }
}
