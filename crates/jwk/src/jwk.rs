use serde::{Deserialize, Serialize};

use crate::{key::Key, prm::Parameters};

/// A set of JSON Web Keys.
///
/// This type is defined in [RFC7517 Section 5].
///
/// [RFC7517 Section 5]: https://datatracker.ietf.org/doc/html/rfc7517#section-5
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys in the set.
    pub keys: Vec<Jwk>,
}

/// A JSON Web Key.
///
/// This type is defined in [RFC7517 Section 4].
///
/// [RFC7517 Section 4]: https://datatracker.ietf.org/doc/html/rfc7517#section-4
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// The key material.
    #[serde(flatten)]
    pub key: Key,

    /// The key parameters.
    #[serde(flatten)]
    pub prm: Parameters,
}

impl Jwk {
    /// The key identifier, if any.
    pub fn kid(&self) -> Option<&str> {
        self.prm.kid.as_deref()
    }

    /// Returns a copy safe to publish: private members removed.
    ///
    /// Symmetric keys have no public form and yield `None`.
    pub fn to_public(&self) -> Option<Jwk> {
        Some(Jwk {
            key: self.key.to_public()?,
            prm: self.prm.sanitized(),
        })
    }
}

impl From<Key> for Jwk {
    fn from(key: Key) -> Self {
        Self {
            key,
            prm: Parameters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Algorithm, Class, Operations, Signing};
    use serde_json::json;

    #[test]
    fn test_parse_rfc7517_public_keys() {
        let set: JwkSet = serde_json::from_value(json!({
            "keys": [
                {
                    "kty": "EC",
                    "crv": "P-256",
                    "x": "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
                    "y": "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
                    "use": "enc",
                    "kid": "1"
                },
                {
                    "kty": "RSA",
                    "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
                    "e": "AQAB",
                    "alg": "RS256",
                    "kid": "2011-04-29"
                }
            ]
        }))
        .unwrap();

        assert_eq!(set.keys.len(), 2);
        assert_eq!(set.keys[0].kid(), Some("1"));
        assert_eq!(set.keys[0].prm.cls, Some(Class::Encryption));
        assert!(matches!(set.keys[0].key, Key::Ec(_)));
        assert_eq!(set.keys[1].kid(), Some("2011-04-29"));
        assert_eq!(set.keys[1].prm.alg, Some(Algorithm::Signing(Signing::Rs256)));
        assert!(matches!(set.keys[1].key, Key::Rsa(_)));
    }

    #[test]
    fn test_unknown_members_are_tolerated() {
        let jwk: Jwk = serde_json::from_value(json!({
            "kty": "oct",
            "k": "QUFBQQ",
            "kid": "hmac",
            "alg": "X-CUSTOM",
            "use": "wrap",
            "key_ops": ["sign", "frobnicate"],
            "ext": true,
            "x-vendor": { "nested": [1, 2, 3] }
        }))
        .unwrap();

        assert_eq!(jwk.kid(), Some("hmac"));
        assert_eq!(jwk.prm.alg, Some(Algorithm::Other("X-CUSTOM".to_string())));
        assert_eq!(jwk.prm.cls, Some(Class::Unknown));
        let ops = jwk.prm.ops.as_ref().unwrap();
        assert!(ops.contains(&Operations::Sign));
        assert!(ops.contains(&Operations::Unknown));
    }

    #[test]
    fn test_to_public_round_trip_keeps_parameters() {
        let jwk: Jwk = serde_json::from_value(json!({
            "kty": "EC",
            "crv": "P-256",
            "x": "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4",
            "y": "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM",
            "d": "870MB6gfuTJ4HtUnUvYMyJpr5eUZNP4Bk43bVdj3eAE",
            "use": "sig",
            "key_ops": ["sign", "verify", "frobnicate"],
            "kid": "ec-1"
        }))
        .unwrap();

        let public = jwk.to_public().unwrap();
        let value = serde_json::to_value(&public).unwrap();

        assert_eq!(value["kid"], "ec-1");
        assert_eq!(value["kty"], "EC");
        assert_eq!(value["use"], "sig");
        assert_eq!(value["key_ops"], json!(["sign", "verify"]));
        assert!(value.get("d").is_none());
    }

    #[test]
    fn test_missing_keys_member_fails() {
        assert!(serde_json::from_value::<JwkSet>(json!({ "kid": "x" })).is_err());
    }
}
