//! Process-local cache store.

use super::{CacheStore, ScanBatch, ScanCursor};
use async_trait::async_trait;
use fintrack_core::{FintrackError, FintrackResult};
use globset::{GlobBuilder, GlobMatcher};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    // Insertion order, used as the scan cursor.
    order: BTreeMap<u64, String>,
    last_seq: u64,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(&entry.seq);
                true
            }
            None => false,
        }
    }

    fn purge_expired(&mut self, now: Instant) {
        let order = &mut self.order;
        self.entries.retain(|_, entry| {
            let live = entry.expires_at > now;
            if !live {
                order.remove(&entry.seq);
            }
            live
        });
    }
}

/// Expired entries are swept once every this many writes.
const SWEEP_INTERVAL: u64 = 256;

/// In-memory [`CacheStore`] with TTL expiry.
///
/// Scans follow the same cursor protocol as Redis: the cursor is the last
/// insertion sequence examined and `0` once the key space is exhausted.
/// Patterns use Redis glob syntax (`*`, `?`, `[...]` and `\` escapes).
/// Expired entries are dropped when read, when a scan passes over them,
/// and by a periodic sweep on write.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    inner: Mutex<Inner>,
}

impl InMemoryCacheStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .lock()
            .entries
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    /// Returns true if there are no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` holds a live entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > now)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> FintrackResult<Option<String>> {
        let mut inner = self.inner.lock();
        let expired = match inner.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()))
            }
            Some(_) => true,
        };
        if expired {
            inner.remove(key);
        }
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> FintrackResult<()> {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        inner.remove(key);
        inner.last_seq += 1;
        let seq = inner.last_seq;
        if seq % SWEEP_INTERVAL == 0 {
            inner.purge_expired(now);
        }
        inner.order.insert(seq, key.to_string());
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
                seq,
            },
        );
        Ok(())
    }

    async fn scan(
        &self,
        pattern: &str,
        cursor: ScanCursor,
        count: u32,
    ) -> FintrackResult<ScanBatch> {
        let matcher = compile_pattern(pattern)?;
        let mut inner = self.inner.lock();
        let now = Instant::now();
        let mut keys = Vec::new();
        let mut expired = Vec::new();
        let mut last = cursor.0;
        let mut examined = 0;

        for (seq, key) in inner.order.range((Bound::Excluded(cursor.0), Bound::Unbounded)) {
            if examined == count.max(1) {
                break;
            }
            examined += 1;
            last = *seq;
            let live = inner
                .entries
                .get(key)
                .is_some_and(|entry| entry.expires_at > now);
            if !live {
                expired.push(key.clone());
            } else if matcher.is_match(key) {
                keys.push(key.clone());
            }
        }
        for key in &expired {
            inner.remove(key);
        }

        let exhausted = inner
            .order
            .range((Bound::Excluded(last), Bound::Unbounded))
            .next()
            .is_none();

        Ok(ScanBatch {
            keys,
            next: if exhausted { ScanCursor::START } else { ScanCursor(last) },
        })
    }

    async fn delete_keys(&self, keys: &[String]) -> FintrackResult<u64> {
        let mut inner = self.inner.lock();
        let deleted = keys.iter().filter(|key| inner.remove(key)).count();
        Ok(deleted as u64)
    }

    async fn ping(&self) -> FintrackResult<()> {
        Ok(())
    }
}

/// Compile a Redis glob pattern. `/` is an ordinary character in keys.
fn compile_pattern(pattern: &str) -> FintrackResult<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| FintrackError::cache(format!("invalid key pattern {pattern:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    fn matches(pattern: &str, key: &str) -> bool {
        compile_pattern(pattern).unwrap().is_match(key)
    }

    #[test]
    fn test_pattern_matching() {
        assert!(matches("transactions:u1:*", "transactions:u1:all:date"));
        assert!(matches("transactions:u1:*", "transactions:u1:"));
        assert!(!matches("transactions:u1:*", "transactions:u10:all"));
        assert!(matches("a?c", "abc"));
        assert!(matches("*:stats:*", "ns:u:stats:_:_"));
        assert!(!matches("a*d", "abc"));
        assert!(matches("ns:*", "ns:a/b:c"));
    }

    #[test]
    fn test_pattern_classes_and_escapes() {
        assert!(matches("ns:[ab]:*", "ns:a:1"));
        assert!(matches("ns:[ab]:*", "ns:b:1"));
        assert!(!matches("ns:[ab]:*", "ns:c:1"));
        assert!(matches(r"a\*b", "a*b"));
        assert!(!matches(r"a\*b", "axb"));
        assert!(matches(r"a\?b", "a?b"));
        assert!(!matches(r"a\?b", "acb"));
    }

    #[tokio::test]
    async fn test_delete_matching_honours_character_class() {
        let cache = InMemoryCacheStore::new();
        cache.set_raw("ns:a:1", "v", TTL).await.unwrap();
        cache.set_raw("ns:c:1", "v", TTL).await.unwrap();

        let deleted = cache.delete_matching("ns:[ab]:*", 10).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(cache.contains_key("ns:c:1"));
    }

    #[tokio::test]
    async fn test_delete_matching_treats_escaped_star_literally() {
        let cache = InMemoryCacheStore::new();
        cache.set_raw("a*b", "v", TTL).await.unwrap();
        cache.set_raw("axb", "v", TTL).await.unwrap();

        let deleted = cache.delete_matching(r"a\*b", 10).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(cache.contains_key("axb"));
        assert!(!cache.contains_key("a*b"));
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_a_cache_error() {
        let cache = InMemoryCacheStore::new();
        let err = cache.scan("ns:[a", ScanCursor::START, 10).await.unwrap_err();
        assert!(matches!(err, FintrackError::Cache(_)));
    }

    #[tokio::test]
    async fn test_scan_drops_expired_entries() {
        let cache = InMemoryCacheStore::new();
        cache.set_raw("ns:old", "v", Duration::ZERO).await.unwrap();
        cache.set_raw("ns:new", "v", TTL).await.unwrap();

        let batch = cache.scan("ns:*", ScanCursor::START, 10).await.unwrap();
        assert_eq!(batch.keys, vec!["ns:new".to_string()]);
        assert_eq!(cache.inner.lock().entries.len(), 1);
        assert_eq!(cache.inner.lock().order.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_sweep_expired_entries() {
        let cache = InMemoryCacheStore::new();
        for i in 0..SWEEP_INTERVAL - 1 {
            cache.set_raw(&format!("stale:{i}"), "v", Duration::ZERO).await.unwrap();
        }
        assert_eq!(cache.inner.lock().entries.len(), (SWEEP_INTERVAL - 1) as usize);

        cache.set_raw("fresh", "v", TTL).await.unwrap();
        let inner = cache.inner.lock();
        assert_eq!(inner.entries.len(), 1);
        assert_eq!(inner.order.len(), 1);
        assert!(inner.entries.contains_key("fresh"));
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let cache = InMemoryCacheStore::new();
        cache.set_raw("k", "one", TTL).await.unwrap();
        cache.set_raw("k", "two", TTL).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_absent() {
        let cache = InMemoryCacheStore::new();
        cache.set_raw("k", "v", Duration::ZERO).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_scan_walks_in_bounded_batches() {
        let cache = InMemoryCacheStore::new();
        for i in 0..7 {
            cache.set_raw(&format!("ns:a:{i}"), "v", TTL).await.unwrap();
            cache.set_raw(&format!("ns:b:{i}"), "v", TTL).await.unwrap();
        }

        let mut cursor = ScanCursor::START;
        let mut found = Vec::new();
        let mut rounds = 0;
        loop {
            let batch = cache.scan("ns:a:*", cursor, 3).await.unwrap();
            assert!(batch.keys.len() <= 3);
            found.extend(batch.keys);
            rounds += 1;
            if batch.next.is_start() {
                break;
            }
            cursor = batch.next;
        }

        found.sort();
        assert_eq!(found.len(), 7);
        assert!(found.iter().all(|k| k.starts_with("ns:a:")));
        assert_eq!(rounds, 5);
    }

    #[tokio::test]
    async fn test_delete_matching_only_touches_pattern() {
        let cache = InMemoryCacheStore::new();
        for i in 0..250 {
            cache.set_raw(&format!("ns:a:{i}"), "v", TTL).await.unwrap();
        }
        cache.set_raw("ns:b:0", "v", TTL).await.unwrap();

        let deleted = cache.delete_matching("ns:a:*", 100).await.unwrap();
        assert_eq!(deleted, 250);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("ns:b:0"));
    }

    #[tokio::test]
    async fn test_scan_of_empty_store_finishes_immediately() {
        let cache = InMemoryCacheStore::new();
        let batch = cache.scan("*", ScanCursor::START, 10).await.unwrap();
        assert!(batch.keys.is_empty());
        assert!(batch.next.is_start());
    }
}
