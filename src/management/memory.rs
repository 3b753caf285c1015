use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::Utc;
use serde_json::Value;

use crate::types::CacheEntry;

use super::SearchCache;

/// In-process [`SearchCache`] honoring the max age of every entry.
///
/// Expired entries are dropped lazily when they are looked up, or all at
/// once through [`MemoryCache::purge_expired`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: HashMap<String, CacheEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub(crate) fn snapshot(&self) -> HashMap<String, CacheEntry> {
        self.lock().clone()
    }

    /// Returns the raw entry under `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now().timestamp_millis();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SearchCache for MemoryCache {
    fn cached_array_for_key(&self, key: &str) -> Option<Vec<Value>> {
        let now = Utc::now().timestamp_millis();
        let mut entries = self.lock();

        if entries.get(key)?.is_expired(now) {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.items.clone())
    }

    fn cache_array(
        &self,
        array: &[Value],
        key: &str,
        params: &BTreeMap<String, String>,
        max_age: Duration,
    ) {
        let entry = CacheEntry {
            items: array.to_vec(),
            params: params.clone(),
            stored_at_ms: Utc::now().timestamp_millis(),
            max_age_ms: max_age.as_millis().try_into().unwrap_or(u64::MAX),
        };
        self.lock().insert(key.to_string(), entry);
    }
}
