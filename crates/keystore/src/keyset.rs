use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use crate::{Error, ErrorKind, KeyRecord};

/// An immutable collection of key records indexed by `kid`.
///
/// A set is built complete from a batch of records or not at all, and offers
/// no way to add or remove a single key afterwards. Replacing keys means
/// building a new set and publishing it whole.
#[derive(Debug, Default)]
pub struct KeySet {
    // Document order is kept for `all`.
    records: Vec<Arc<KeyRecord>>,
    index: HashMap<String, usize>,
}

/// Membership changes between two key sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeySetChanges {
    pub added: usize,
    pub removed: usize,
    pub retained: usize,
}

impl KeySet {
    /// A set with no keys.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from a complete batch of records.
    ///
    /// Fails with [`ErrorKind::DuplicateKey`] if two records share a `kid`;
    /// nothing of the partially built set escapes in that case.
    pub fn build<I>(records: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = KeyRecord>,
    {
        let records = records.into_iter();
        let (capacity, _) = records.size_hint();
        let mut set = KeySet {
            records: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        };

        for record in records {
            match set.index.entry(record.kid().to_owned()) {
                Entry::Occupied(entry) => {
                    return Err(Error::msg(
                        ErrorKind::DuplicateKey,
                        format!("kid {:?} appears more than once in the key set", entry.key()),
                    ));
                }
                Entry::Vacant(entry) => {
                    entry.insert(set.records.len());
                    set.records.push(Arc::new(record));
                }
            }
        }

        Ok(set)
    }

    /// Finds the record bound to `kid`.
    pub fn lookup(&self, kid: &str) -> Option<Arc<KeyRecord>> {
        self.index
            .get(kid)
            .map(|&position| Arc::clone(&self.records[position]))
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.index.contains_key(kid)
    }

    /// Every record of the set, in the order they were supplied to [`KeySet::build`].
    pub fn all(&self) -> Vec<Arc<KeyRecord>> {
        self.records.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<KeyRecord>> {
        self.records.iter()
    }

    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.kid())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compares membership of `self` (older) against `next`.
    pub fn changes(&self, next: &KeySet) -> KeySetChanges {
        let retained = self.kids().filter(|kid| next.contains(kid)).count();
        KeySetChanges {
            added: next.len() - retained,
            removed: self.len() - retained,
            retained,
        }
    }

    /// A copy of this set where `record` is inserted or replaces the record
    /// with the same `kid`.
    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn with_record(&self, record: KeyRecord) -> KeySet {
        let mut records: Vec<KeyRecord> = self
            .records
            .iter()
            .map(|existing| existing.as_ref().clone())
            .collect();
        match self.index.get(record.kid()) {
            Some(&position) => records[position] = record,
            None => records.push(record),
        }
        Self::from_unique(records)
    }

    /// A copy of this set without `kid`, or `None` if `kid` is absent.
    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn without(&self, kid: &str) -> Option<KeySet> {
        if !self.contains(kid) {
            return None;
        }
        let records = self
            .records
            .iter()
            .filter(|existing| existing.kid() != kid)
            .map(|existing| existing.as_ref().clone());
        Some(Self::from_unique(records))
    }

    #[cfg(any(test, feature = "test-utils"))]
    fn from_unique<I>(records: I) -> KeySet
    where
        I: IntoIterator<Item = KeyRecord>,
    {
        let mut set = KeySet::empty();
        for record in records {
            set.index.insert(record.kid().to_owned(), set.records.len());
            set.records.push(Arc::new(record));
        }
        set
    }
}
