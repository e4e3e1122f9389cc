//! store.rs: in-memory collection of admitted records, keyed by URL.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::record::NewsRecord;

pub const COLLECTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_STORE_CAPACITY: usize = 10_000;

/// A record as held by the collection, with the caller-attached stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedItem {
    #[serde(flatten)]
    pub record: NewsRecord,
    pub collected_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_date: Option<String>,
}

impl CollectedItem {
    pub fn new(record: NewsRecord, collected_at: impl Into<String>) -> Self {
        Self {
            record,
            collected_at: collected_at.into(),
            search_date: None,
        }
    }

    pub fn with_search_date(mut self, date: impl Into<String>) -> Self {
        self.search_date = Some(date.into());
        self
    }
}

/// Local wall-clock stamp for `collected_at`.
pub fn now_stamp() -> String {
    chrono::Local::now().format(COLLECTED_AT_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
}

#[derive(Debug)]
pub struct NewsStore {
    inner: Mutex<Vec<CollectedItem>>,
    cap: usize,
}

impl Default for NewsStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_STORE_CAPACITY)
    }
}

impl NewsStore {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, DEFAULT_STORE_CAPACITY);
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(256))),
            cap,
        }
    }

    // A panic while holding the lock cannot leave a half-written Vec behind, so keep going.
    fn lock(&self) -> MutexGuard<'_, Vec<CollectedItem>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Upsert by `url`: a known URL is replaced in place, a new one is appended.
    /// Oldest entries are dropped beyond capacity.
    pub fn merge(&self, items: Vec<CollectedItem>) -> MergeStats {
        let mut stats = MergeStats::default();
        let mut v = self.lock();
        for item in items {
            match v.iter_mut().find(|x| x.record.url == item.record.url) {
                Some(slot) => {
                    *slot = item;
                    stats.updated += 1;
                }
                None => {
                    v.push(item);
                    stats.inserted += 1;
                }
            }
        }
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, url: &str) -> Option<CollectedItem> {
        self.lock().iter().find(|x| x.record.url == url).cloned()
    }

    pub fn snapshot(&self) -> Vec<CollectedItem> {
        self.lock().clone()
    }

    /// Items `offset..offset+limit` in insertion order.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<CollectedItem> {
        self.lock().iter().skip(offset).take(limit).cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
