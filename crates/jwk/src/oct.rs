use serde::{Deserialize, Serialize};

use crate::Secret;

/// A symmetric octet key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oct {
    /// The symmetric key.
    pub k: Secret,
}
