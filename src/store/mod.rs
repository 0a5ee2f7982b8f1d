//! In-memory record store.
//!
//! # Data Flow
//! ```text
//! dataset CSV
//!     → dataset.rs (parse rows, validate keys)
//!     → RecordStore (seeded, counter = highest key)
//!     → shared by handle with the HTTP dispatcher
//!
//! POST   → next_key() + put()
//! PUT    → put()
//! DELETE → delete()
//! GET    → list() / get()
//! ```
//!
//! # Design Decisions
//! - DashMap gives per-key atomicity without a global lock
//! - Key counter is a separate atomic that never decreases
//! - Nothing survives the process

pub mod dataset;
pub mod record;

pub use dataset::{load_dataset, load_from_reader, DatasetError};
pub use record::Record;

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::observability::metrics;

/// Value of the counter before any key has been issued.
const NO_KEY_ISSUED: i64 = -1;

/// Errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The counter already sits at the largest representable key.
    #[error("key space exhausted: last key is {last}")]
    KeysExhausted { last: i64 },
}

/// A thread-safe keyed collection of records.
///
/// Cloning yields another handle to the same data.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<DashMap<String, Record>>,
    /// Highest key ever issued or observed.
    last_key: Arc<AtomicI64>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            last_key: Arc::new(AtomicI64::new(NO_KEY_ISSUED)),
        }
    }

    /// All keys, in ascending numeric order (non-numeric keys last, lexically).
    pub fn list(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.iter().map(|r| r.key().clone()).collect();
        keys.sort_by(|a, b| compare_keys(a, b));
        keys
    }

    /// Get a copy of the record stored under `key`.
    pub fn get(&self, key: &str) -> Option<Record> {
        self.records.get(key).map(|r| r.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Insert or overwrite the record under `key`.
    ///
    /// Decimal keys raise the counter so minted keys never land on them.
    pub fn put(&self, key: impl Into<String>, record: Record) {
        let key = key.into();
        if let Some(value) = parse_key(&key) {
            self.last_key.fetch_max(value, Ordering::SeqCst);
        }
        self.records.insert(key, record);
        metrics::record_store_size(self.records.len());
    }

    /// Remove the record under `key`. Returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.records.remove(key).is_some();
        if removed {
            metrics::record_store_size(self.records.len());
        }
        removed
    }

    /// Mint a fresh key greater than every key issued so far.
    ///
    /// Once the counter reaches `i64::MAX` every call fails; it never wraps.
    pub fn next_key(&self) -> Result<String, StoreError> {
        self.last_key
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|previous| (previous + 1).to_string())
            .map_err(|last| StoreError::KeysExhausted { last })
    }

    /// Highest key issued or observed, if any.
    pub fn last_key(&self) -> Option<i64> {
        match self.last_key.load(Ordering::SeqCst) {
            NO_KEY_ISSUED => None,
            value => Some(value),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_key(key: &str) -> Option<i64> {
    key.trim().parse().ok()
}

fn compare_keys(a: &str, b: &str) -> CmpOrdering {
    match (parse_key(a), parse_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str) -> Record {
        Record::Json(json!({ "name": name }))
    }

    #[test]
    fn test_put_get_delete() {
        let store = RecordStore::new();
        store.put("1", record("a"));

        assert_eq!(store.get("1"), Some(record("a")));
        assert!(store.contains("1"));

        store.put("1", record("b"));
        assert_eq!(store.get("1"), Some(record("b")));
        assert_eq!(store.len(), 1);

        assert!(store.delete("1"));
        assert!(!store.delete("1"));
        assert_eq!(store.get("1"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_is_numeric_order() {
        let store = RecordStore::new();
        for key in ["10", "2", "1", "abc"] {
            store.put(key, record(key));
        }
        assert_eq!(store.list(), vec!["1", "2", "10", "abc"]);
    }

    #[test]
    fn test_next_key_starts_at_zero() {
        let store = RecordStore::new();
        assert_eq!(store.last_key(), None);
        assert_eq!(store.next_key().unwrap(), "0");
        assert_eq!(store.next_key().unwrap(), "1");
        assert_eq!(store.last_key(), Some(1));
    }

    #[test]
    fn test_next_key_follows_highest_put() {
        let store = RecordStore::new();
        store.put("3", record("c"));
        store.put("1", record("a"));
        assert_eq!(store.next_key().unwrap(), "4");

        // Upsert beyond the counter must not be shadowed by the next minted key
        store.put("9", record("i"));
        assert_eq!(store.next_key().unwrap(), "10");
    }

    #[test]
    fn test_next_key_exhausted_at_max() {
        let store = RecordStore::new();
        store.put(i64::MAX.to_string(), record("last"));

        let exhausted = StoreError::KeysExhausted { last: i64::MAX };
        assert_eq!(store.next_key(), Err(exhausted.clone()));
        // The counter stays put instead of wrapping negative
        assert_eq!(store.next_key(), Err(exhausted));
        assert_eq!(store.last_key(), Some(i64::MAX));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_next_key_reaches_max_once() {
        let store = RecordStore::new();
        store.put((i64::MAX - 1).to_string(), record("almost"));

        assert_eq!(store.next_key().unwrap(), i64::MAX.to_string());
        assert!(store.next_key().is_err());
    }

    #[test]
    fn test_counter_survives_delete() {
        let store = RecordStore::new();
        store.put("5", record("e"));
        assert!(store.delete("5"));
        assert_eq!(store.next_key().unwrap(), "6");
    }

    #[test]
    fn test_concurrent_next_key_unique() {
        let store = RecordStore::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || (0..100).map(|_| store.next_key().unwrap()).collect::<Vec<_>>())
            })
            .collect();

        let mut keys: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|k| k.parse().unwrap())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 800);
        assert_eq!(keys.first(), Some(&0));
        assert_eq!(keys.last(), Some(&799));
    }
}
