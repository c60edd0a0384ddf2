use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use log::warn;

#[derive(Debug, Clone)]
enum CacheEntry {
    Resolved(String),
    Absent { expires_at: Instant },
}

/// Result of a tier 1 lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(String),
    /// A recent scrape found nothing; skip the pipeline until the entry expires.
    KnownAbsent,
    Miss,
}

/// Process-local slug to URL map (tier 1).
///
/// Resolved entries are never evicted. Concurrent writers for the same slug
/// store the same URL, so last-write-wins is fine.
#[derive(Debug, Default)]
pub struct AvatarCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl AvatarCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> CacheLookup {
        match self.read().get(slug) {
            Some(CacheEntry::Resolved(url)) => CacheLookup::Hit(url.clone()),
            Some(CacheEntry::Absent { expires_at }) if *expires_at > Instant::now() => {
                CacheLookup::KnownAbsent
            }
            _ => CacheLookup::Miss,
        }
    }

    pub fn insert(&self, slug: impl Into<String>, url: impl Into<String>) {
        self.write()
            .insert(slug.into(), CacheEntry::Resolved(url.into()));
    }

    /// Records a negative result. Never overwrites a resolved URL.
    pub fn mark_absent(&self, slug: &str, ttl: Duration) {
        let mut entries = self.write();
        if matches!(entries.get(slug), Some(CacheEntry::Resolved(_))) {
            return;
        }
        entries.insert(
            slug.to_string(),
            CacheEntry::Absent {
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Number of resolved URLs held.
    pub fn len(&self) -> usize {
        self.read()
            .values()
            .filter(|e| matches!(e, CacheEntry::Resolved(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Avatar cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Avatar cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
