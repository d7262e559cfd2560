use super::record::Record;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Storage for records fetched by primary key.
///
/// Keys are scoped by table name so one cache can serve several tables.
pub trait RecordCache: Send + Sync {
    fn get(&self, table: &str, key: &str) -> Option<Record>;

    fn put(&self, table: &str, key: &str, record: Record);

    fn invalidate(&self, table: &str, key: &str);

    /// Drop every entry of `table`.
    fn clear_table(&self, table: &str);
}

/// In-process [`RecordCache`] bounded by record count, evicting the least
/// recently used record across all tables. Entries may also expire after a
/// time-to-live.
#[derive(Debug)]
pub struct MemoryCache {
    state: Mutex<CacheState>,
}

#[derive(Debug)]
struct Slot {
    record: Record,
    stored_at: Instant,
    used_at: u64,
}

#[derive(Debug)]
struct CacheState {
    capacity: usize,
    ttl: Option<Duration>,
    clock: u64,
    len: usize,
    tables: HashMap<String, HashMap<String, Slot>>,
}

impl MemoryCache {
    /// A cache holding at most `capacity` records. Zero disables storage.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                capacity,
                ttl: None,
                clock: 0,
                len: 0,
                tables: HashMap::new(),
            }),
        }
    }

    /// Expire entries `ttl` after they were stored.
    pub fn with_ttl(self, ttl: Duration) -> Self {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        state.ttl = Some(ttl);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn len(&self) -> usize {
        self.state().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordCache for MemoryCache {
    fn get(&self, table: &str, key: &str) -> Option<Record> {
        let mut state = self.state();
        let ttl = state.ttl;
        let now = state.tick();
        let slot = state.tables.get_mut(table)?.get_mut(key)?;
        if ttl.is_some_and(|ttl| slot.stored_at.elapsed() > ttl) {
            state.take(table, key);
            return None;
        }
        slot.used_at = now;
        Some(slot.record.clone())
    }

    fn put(&self, table: &str, key: &str, record: Record) {
        let mut state = self.state();
        if state.capacity == 0 {
            return;
        }
        let slot = Slot {
            record,
            stored_at: Instant::now(),
            used_at: state.tick(),
        };
        let replaced = state
            .tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), slot);
        if replaced.is_none() {
            state.len += 1;
        }
        while state.len > state.capacity {
            if !state.evict_one() {
                break;
            }
        }
    }

    fn invalidate(&self, table: &str, key: &str) {
        self.state().take(table, key);
    }

    fn clear_table(&self, table: &str) {
        let mut state = self.state();
        if let Some(entries) = state.tables.remove(table) {
            state.len -= entries.len();
        }
    }
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn take(&mut self, table: &str, key: &str) -> Option<Slot> {
        let entries = self.tables.get_mut(table)?;
        let slot = entries.remove(key)?;
        if entries.is_empty() {
            self.tables.remove(table);
        }
        self.len -= 1;
        Some(slot)
    }

    /// Drop the least recently used record. False when there is none.
    fn evict_one(&mut self) -> bool {
        let victim = self
            .tables
            .iter()
            .flat_map(|(table, entries)| {
                entries
                    .iter()
                    .map(move |(key, slot)| (slot.used_at, table, key))
            })
            .min_by_key(|(used_at, ..)| *used_at)
            .map(|(_, table, key)| (table.clone(), key.clone()));
        match victim {
            Some((table, key)) => self.take(&table, &key).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableSchema;
    use crate::value::Value;
    use std::sync::Arc;

    fn record(id: i64) -> Record {
        let schema: Arc<TableSchema> = TableSchema::builder("t")
            .columns(["id"])
            .primary_key(["id"])
            .build()
            .unwrap();
        Record::new(schema).with("id", id).unwrap()
    }

    #[test]
    fn test_lru_eviction() {
        let cache = MemoryCache::new(2);
        cache.put("t", "1", record(1));
        cache.put("t", "2", record(2));
        // Touch 1 so 2 becomes the oldest.
        assert!(cache.get("t", "1").is_some());
        cache.put("t", "3", record(3));
        assert!(cache.get("t", "2").is_none());
        assert!(cache.get("t", "1").is_some());
        assert!(cache.get("t", "3").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_and_clear_table() {
        let cache = MemoryCache::new(10);
        cache.put("t", "1", record(1));
        cache.put("t", "2", record(2));
        cache.put("u", "1", record(1));
        cache.invalidate("t", "1");
        assert!(cache.get("t", "1").is_none());
        cache.clear_table("t");
        assert!(cache.get("t", "2").is_none());
        assert_eq!(cache.get("u", "1").unwrap().get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = MemoryCache::new(10).with_ttl(Duration::from_millis(0));
        cache.put("t", "1", record(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("t", "1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_spans_tables() {
        let cache = MemoryCache::new(3);
        cache.put("t", "1", record(1));
        cache.put("u", "1", record(1));
        cache.put("t", "2", record(2));
        assert!(cache.get("t", "1").is_some());
        // `u/1` is now the least recently used.
        cache.put("u", "2", record(2));
        assert!(cache.get("u", "1").is_none());
        assert_eq!(cache.len(), 3);

        cache.clear_table("t");
        assert_eq!(cache.len(), 1);
        cache.put("t", "3", record(3));
        cache.put("t", "3", record(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("u", "2").is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = MemoryCache::new(0);
        cache.put("t", "1", record(1));
        assert!(cache.get("t", "1").is_none());
    }
}
