use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::KeySet;

/// The handle to the key set currently served to readers.
///
/// Readers clone the inner `Arc` under a read lock and then work on that
/// snapshot without holding any lock. The write lock is only ever held for
/// a single pointer replacement, so readers wait at most for one swap,
/// never for a fetch, a parse or the construction of a set.
#[derive(Debug)]
pub struct ActiveKeySet {
    current: RwLock<Arc<KeySet>>,
    // Serialises publishers. Held only around one pointer check and store.
    publish: Mutex<()>,
}

impl ActiveKeySet {
    pub fn new(initial: KeySet) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            publish: Mutex::new(()),
        }
    }

    /// Returns the active set.
    pub fn load(&self) -> Arc<KeySet> {
        self.current.read().clone()
    }

    /// Publishes `next` and returns the set it replaced.
    ///
    /// Waits at most for another publisher's pointer replacement, never for
    /// the construction of a set.
    pub fn replace(&self, next: Arc<KeySet>) -> Arc<KeySet> {
        let _publisher = self.publish.lock();
        self.store(next)
    }

    /// Publishes the set computed from the active one.
    ///
    /// `f` runs without any lock held. If another publisher replaced the set
    /// meanwhile, the result is discarded and `f` runs again on the newer
    /// set, so a concurrent replacement is never overwritten with a stale
    /// copy. Readers keep seeing the old set until the result is published.
    pub fn update<F>(&self, mut f: F) -> Arc<KeySet>
    where
        F: FnMut(&KeySet) -> Option<KeySet>,
    {
        loop {
            let current = self.load();
            let Some(next) = f(&current) else {
                return current;
            };

            let _publisher = self.publish.lock();
            if Arc::ptr_eq(&current, &self.current.read()) {
                return self.store(Arc::new(next));
            }
        }
    }

    fn store(&self, next: Arc<KeySet>) -> Arc<KeySet> {
        std::mem::replace(&mut *self.current.write(), next)
    }
}

impl Default for ActiveKeySet {
    fn default() -> Self {
        Self::new(KeySet::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyRecord;
    use jwk::{Jwk, Key};
    use serde_json::json;

    fn set_of(kids: &[&str]) -> KeySet {
        KeySet::build(kids.iter().map(|kid| {
            let key: Key = serde_json::from_value(json!({ "kty": "oct", "k": "QUFBQQ" })).unwrap();
            KeyRecord::new(*kid, Jwk::from(key))
        }))
        .unwrap()
    }

    #[test]
    fn test_replace_returns_previous_set() {
        let active = ActiveKeySet::new(set_of(&["old"]));

        let previous = active.replace(Arc::new(set_of(&["new-0", "new-1"])));

        assert!(previous.contains("old"));
        assert!(!active.load().contains("old"));
        assert_eq!(active.load().len(), 2);
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let active = ActiveKeySet::new(set_of(&["old"]));
        let snapshot = active.load();

        active.replace(Arc::new(set_of(&["new"])));

        assert!(snapshot.contains("old"));
        assert!(!snapshot.contains("new"));
    }

    #[test]
    fn test_update_recomputes_after_concurrent_replace() {
        let active = ActiveKeySet::new(set_of(&["a"]));
        let mut calls = 0;

        active.update(|current| {
            calls += 1;
            if calls == 1 {
                // A refresh publishes while the copy is being built.
                active.replace(Arc::new(set_of(&["x"])));
            }
            Some(current.with_record(set_of(&["b"]).lookup("b")?.as_ref().clone()))
        });

        assert_eq!(calls, 2);
        assert_eq!(active.load().kids().collect::<Vec<_>>(), vec!["x", "b"]);
    }

    #[test]
    fn test_update_without_change_keeps_set() {
        let active = ActiveKeySet::new(set_of(&["a"]));
        let before = active.load();

        let after = active.update(|_| None);

        assert!(Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&before, &active.load()));
    }
}
