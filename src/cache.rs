use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::events::MessageSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    session_id: String,
    snapshot: MessageSnapshot,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    raw: Value,
}

/// Memoizes backend replies per (session, conversation so far) for a fixed window
#[derive(Debug, Clone)]
pub struct ResponseCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up a reply that is still inside the expiry window
    pub fn get(&mut self, session_id: &str, snapshot: &MessageSnapshot) -> Option<Value> {
        self.evict_expired();
        let key = CacheKey {
            session_id: session_id.to_string(),
            snapshot: snapshot.clone(),
        };
        self.entries.get(&key).map(|entry| entry.raw.clone())
    }

    pub fn insert(&mut self, session_id: &str, snapshot: MessageSnapshot, raw: Value) {
        if self.ttl.is_zero() {
            return;
        }
        let key = CacheKey {
            session_id: session_id.to_string(),
            snapshot,
        };
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                raw,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }
}
