//! Short-lived result cache.
//!
//! Entries are replaced wholesale, never mutated in place; a stale
//! entry is simply ignored until the next batch overwrites it.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::DomainResult;

/// One cached batch
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub results: Vec<DomainResult>,
    pub created_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// TTL-bounded cache keyed by the normalized batch query
pub struct ResultCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh results for `key`, if any
    pub fn get(&self, key: &str) -> Option<Vec<DomainResult>> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.results.clone())
    }

    /// Store a completed batch, replacing any prior entry for the key
    pub fn insert(&self, key: String, results: Vec<DomainResult>) {
        let entry = CacheEntry {
            results,
            created_at: Instant::now(),
        };
        self.entries.write().insert(key, entry);
    }

    /// Drop entries past their TTL
    pub fn purge_stale(&self) {
        let ttl = self.ttl;
        self.entries.write().retain(|_, entry| entry.is_fresh(ttl));
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainStatus;
    use chrono::Utc;

    fn sample(domain: &str) -> DomainResult {
        DomainResult {
            domain: domain.to_string(),
            status: DomainStatus::Available,
            error_category: None,
            error_message: None,
            link: String::new(),
            evidence: Vec::new(),
            dnssec_validated: false,
            wildcard_detected: false,
            is_parked_by_ns: false,
            is_parked_by_txt: false,
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn fresh_entries_hit() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.insert("acme|.com,.io".to_string(), vec![sample("acme.com")]);

        let hit = cache.get("acme|.com,.io").unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].domain, "acme.com");
        assert!(cache.get("other|.com").is_none());
    }

    #[test]
    fn stale_entries_miss() {
        let cache = ResultCache::new(Duration::ZERO);
        cache.insert("acme|.com".to_string(), vec![sample("acme.com")]);
        assert!(cache.get("acme|.com").is_none());

        // Still physically present until purged.
        assert_eq!(cache.len(), 1);
        cache.purge_stale();
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_replaces_prior_entry() {
        let cache = ResultCache::new(Duration::from_secs(300));
        cache.insert("acme|.com".to_string(), vec![sample("acme.com")]);
        cache.insert(
            "acme|.com".to_string(),
            vec![sample("acme.com"), sample("acme.io")],
        );

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("acme|.com").unwrap().len(), 2);
    }
}
