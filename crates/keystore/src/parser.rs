use jwk::{Jwk, Key};
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, ErrorKind, KeyRecord};

/// Turns a fetched document into key records.
pub trait KeySetParser: Send + Sync {
    /// Parses `raw` into the complete list of records it describes.
    ///
    /// Implementations must either return every record or fail; the caller
    /// never publishes anything from a failed parse.
    fn parse(&self, raw: &[u8]) -> Result<Vec<KeyRecord>, Error>;
}

/// Parser for JSON Web Key Set documents (`{"keys": [...]}`).
///
/// Unknown members are ignored. Keys of an unsupported `kty` and keys without
/// a `kid` are skipped since they can never be resolved. A supported key with
/// malformed members fails the whole document.
#[derive(Debug, Default, Clone, Copy)]
pub struct JwksParser;

#[derive(Deserialize)]
struct RawJwkSet {
    keys: Vec<Value>,
}

impl KeySetParser for JwksParser {
    fn parse(&self, raw: &[u8]) -> Result<Vec<KeyRecord>, Error> {
        let document: RawJwkSet = serde_json::from_slice(raw)?;
        let mut records = Vec::with_capacity(document.keys.len());

        for (position, value) in document.keys.into_iter().enumerate() {
            let kty = match value.get("kty").and_then(Value::as_str) {
                Some(kty) => kty,
                None => {
                    return Err(Error::msg(
                        ErrorKind::Parse,
                        format!("key at position {position} has no \"kty\" member"),
                    ))
                }
            };

            if !Key::is_supported_type(kty) {
                tracing::warn!(position, kty, "skipping key of unsupported type");
                continue;
            }

            let jwk: Jwk = serde_json::from_value(value).map_err(|err| {
                Error::msg(
                    ErrorKind::Parse,
                    format!("key at position {position} is malformed: {err}"),
                )
            })?;

            match KeyRecord::from_jwk(jwk) {
                Some(record) => records.push(record),
                None => tracing::warn!(position, "skipping key without \"kid\""),
            }
        }

        Ok(records)
    }
}
