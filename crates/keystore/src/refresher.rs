use std::sync::Arc;

use crate::{ActiveKeySet, Error, JwksParser, KeySet, KeySetParser};

/// Turns fetched documents into key sets and publishes them.
///
/// A refresh is always build-then-publish: the candidate set is constructed
/// in full off to the side, then installed with one handle replacement.
/// The live set is never edited key by key, so no reader can observe old and
/// new membership mixed together, or a key missing halfway through.
#[derive(Clone)]
pub struct Refresher {
    parser: Arc<dyn KeySetParser>,
}

impl Refresher {
    pub fn new(parser: Arc<dyn KeySetParser>) -> Self {
        Self { parser }
    }

    /// Builds the candidate set described by `raw`.
    ///
    /// Parse and duplicate-key failures leave no trace; the active set is
    /// not touched by this method at all.
    pub fn parse(&self, raw: &[u8]) -> Result<KeySet, Error> {
        KeySet::build(self.parser.parse(raw)?)
    }

    /// Installs `candidate` as the active set and returns the replaced one.
    pub fn swap<S>(&self, active: &ActiveKeySet, candidate: S) -> Arc<KeySet>
    where
        S: Into<Arc<KeySet>>,
    {
        active.replace(candidate.into())
    }
}

impl Default for Refresher {
    fn default() -> Self {
        Self::new(Arc::new(JwksParser))
    }
}

impl std::fmt::Debug for Refresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refresher").finish_non_exhaustive()
    }
}
