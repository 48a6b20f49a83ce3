use base64ct::{Base64Url, Base64UrlUnpadded, Encoding};
use core::{fmt, ops::Deref};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Binary data carried as a base64url string.
///
/// Serialization always emits the unpadded alphabet required by RFC 7515.
/// Deserialization also accepts padded input since some issuers publish it.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(Box<[u8]>);

impl Bytes {
    /// Returns the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the base64url (unpadded) form.
    pub fn encode(&self) -> String {
        Base64UrlUnpadded::encode_string(&self.0)
    }
}

pub(crate) fn decode_base64url(encoded: &str) -> Result<Vec<u8>, base64ct::Error> {
    if encoded.ends_with('=') {
        Base64Url::decode_vec(encoded)
    } else {
        Base64UrlUnpadded::decode_vec(encoded)
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into_boxed_slice())
    }
}

impl From<&[u8]> for Bytes {
    fn from(value: &[u8]) -> Self {
        Self(value.into())
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bytes").field(&self.encode()).finish()
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        decode_base64url(&encoded)
            .map(Self::from)
            .map_err(|_| D::Error::custom("invalid base64url value"))
    }
}
