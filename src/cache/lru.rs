//! LRU Store Module
//!
//! Byte-budgeted least-recently-used store with O(1) lookup, update and
//! eviction.
//!
//! Entries live in a slot vector and are chained into a doubly linked list by
//! index:
//! - Head = Most recently used
//! - Tail = Least recently used
//!
//! A `HashMap` maps each key to its slot so that lookups never walk the list.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// == Byte Size ==
/// Size accounting for values held by an [`LruStore`].
pub trait ByteSize {
    /// Number of bytes the value occupies.
    fn byte_len(&self) -> usize;
}

impl ByteSize for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// Callback run with the key and value of every evicted entry.
pub type OnEvicted<V> = Arc<dyn Fn(&str, &V) + Send + Sync>;

type SlotId = usize;

struct Node<V> {
    key: String,
    value: V,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == LRU Store ==
/// Recency-ordered key/value store bounded by a byte budget.
///
/// An entry accounts for `key.len() + value.byte_len()` bytes. A budget of
/// zero means the store never evicts on its own.
pub struct LruStore<V> {
    max_bytes: u64,
    used_bytes: u64,
    slots: Vec<Option<Node<V>>>,
    free: Vec<SlotId>,
    index: HashMap<String, SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    evictions: u64,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: ByteSize> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store with the given byte budget (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            evictions: 0,
            on_evicted: None,
        }
    }

    /// Installs the eviction callback.
    ///
    /// The callback runs synchronously inside `evict_one`; when the store is
    /// wrapped in a `SharedCache` that means under the cache lock, so it must
    /// not call back into the same cache.
    pub fn with_on_evicted(mut self, on_evicted: OnEvicted<V>) -> Self {
        self.on_evicted = Some(on_evicted);
        self
    }

    // == Add ==
    /// Inserts or updates `key` and marks it most recently used.
    ///
    /// Eviction runs after the write, so the newest entry is always accepted
    /// first; older entries are then dropped until the budget holds again.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(&id) = self.index.get(key) {
            let sizes = self.node_mut(id).map(|node| {
                let old = node.value.byte_len();
                node.value = value;
                (old, node.value.byte_len())
            });
            if let Some((old, new)) = sizes {
                self.used_bytes = self.used_bytes - old as u64 + new as u64;
            }
            self.touch(id);
        } else {
            self.used_bytes += entry_size(key, &value);
            let id = self.alloc(Node {
                key: key.to_string(),
                value,
                prev: None,
                next: None,
            });
            self.attach_front(id);
            self.index.insert(key.to_string(), id);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.evict_one().is_none() {
                break;
            }
        }
    }

    // == Get ==
    /// Looks up `key`, refreshing its recency on a hit.
    ///
    /// A miss leaves the store untouched.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.touch(id);
        self.node(id).map(|node| &node.value)
    }

    // == Evict One ==
    /// Removes the least recently used entry and returns it.
    ///
    /// Returns None (and does nothing) if the store is empty.
    pub fn evict_one(&mut self) -> Option<(String, V)> {
        let id = self.tail?;
        self.detach(id);
        let node = self.slots.get_mut(id).and_then(Option::take)?;
        self.free.push(id);
        self.index.remove(&node.key);
        self.used_bytes -= entry_size(&node.key, &node.value);
        self.evictions += 1;

        if let Some(on_evicted) = &self.on_evicted {
            on_evicted(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }
}

impl<V> LruStore<V> {
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Bytes currently accounted for (keys plus values).
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Entries evicted since the store was created.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Iterates entries from most to least recently used without touching
    /// recency.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }

    // == Slot Helpers ==
    fn node(&self, id: SlotId) -> Option<&Node<V>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<V>> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: Node<V>) -> SlotId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    // == List Helpers ==
    fn touch(&mut self, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.detach(id);
        self.attach_front(id);
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(node) = self.node_mut(prev_id) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(node) = self.node_mut(next_id) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_id) => {
                if let Some(node) = self.node_mut(head_id) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}

impl<V> fmt::Debug for LruStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.len())
            .field("evictions", &self.evictions)
            .finish_non_exhaustive()
    }
}

// == Iterator ==
/// Iterator over `(key, value)` pairs, most recently used first.
pub struct Iter<'a, V> {
    store: &'a LruStore<V>,
    cursor: Option<SlotId>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.store.node(self.cursor?)?;
        self.cursor = node.next;
        Some((node.key.as_str(), &node.value))
    }
}

fn entry_size<V: ByteSize>(key: &str, value: &V) -> u64 {
    (key.len() + value.byte_len()) as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn keys(store: &LruStore<String>) -> Vec<String> {
        store.iter().map(|(k, _)| k.to_string()).collect()
    }

    #[test]
    fn test_store_new() {
        let store: LruStore<String> = LruStore::new(100);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.used_bytes(), 0);
        assert_eq!(store.max_bytes(), 100);
    }

    #[test]
    fn test_add_and_get() {
        let mut store = LruStore::new(0);
        store.add("key1", "1234".to_string());

        assert_eq!(store.get("key1"), Some(&"1234".to_string()));
        assert_eq!(store.used_bytes(), 8);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_miss_leaves_state_unchanged() {
        let mut store = LruStore::new(0);
        store.add("a", "1".to_string());
        store.add("b", "2".to_string());
        let before = keys(&store);

        assert!(store.get("missing").is_none());

        assert_eq!(keys(&store), before);
        assert_eq!(store.used_bytes(), 4);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_adjusts_used_bytes() {
        let mut store = LruStore::new(0);
        store.add("k", "short".to_string());
        assert_eq!(store.used_bytes(), 6);

        store.add("k", "much longer".to_string());
        assert_eq!(store.used_bytes(), 12);
        assert_eq!(store.len(), 1);

        store.add("k", "x".to_string());
        assert_eq!(store.used_bytes(), 2);
        assert_eq!(store.get("k"), Some(&"x".to_string()));
    }

    #[test]
    fn test_update_moves_key_to_front() {
        let mut store = LruStore::new(0);
        store.add("a", "1".to_string());
        store.add("b", "2".to_string());
        store.add("a", "3".to_string());

        assert_eq!(keys(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_eviction_is_strict_lru() {
        // Each entry is 4 bytes, the budget fits exactly two.
        let mut store = LruStore::new(8);
        store.add("k1", "v1".to_string());
        store.add("k2", "v2".to_string());
        store.add("k3", "v3".to_string());

        assert!(!store.contains("k1"));
        assert!(store.contains("k2"));
        assert!(store.contains("k3"));

        // Reading k2 makes k3 the eviction candidate
        assert!(store.get("k2").is_some());
        store.add("k4", "v4".to_string());

        assert!(!store.contains("k3"));
        assert!(store.contains("k2"));
        assert!(store.contains("k4"));
        assert_eq!(store.used_bytes(), 8);
        assert_eq!(store.evictions(), 2);
    }

    #[test]
    fn test_oversized_entry_evicts_everything() {
        let mut store = LruStore::new(10);
        store.add("a", "1".to_string());
        store.add("b", "2".to_string());

        store.add("big", "0123456789".to_string());

        assert!(store.is_empty());
        assert_eq!(store.used_bytes(), 0);
        assert_eq!(store.evictions(), 3);
    }

    #[test]
    fn test_unbounded_budget_never_evicts() {
        let mut store = LruStore::new(0);
        for i in 0..1000 {
            store.add(&format!("key{}", i), "value".to_string());
        }
        assert_eq!(store.len(), 1000);
        assert_eq!(store.evictions(), 0);
    }

    #[test]
    fn test_evict_one_on_empty_store() {
        let mut store: LruStore<String> = LruStore::new(10);
        assert!(store.evict_one().is_none());
        assert_eq!(store.evictions(), 0);
    }

    #[test]
    fn test_evict_one_returns_oldest() {
        let mut store = LruStore::new(0);
        store.add("a", "1".to_string());
        store.add("b", "2".to_string());

        assert_eq!(store.evict_one(), Some(("a".to_string(), "1".to_string())));
        assert_eq!(store.used_bytes(), 2);
        assert_eq!(keys(&store), vec!["b"]);
    }

    #[test]
    fn test_on_evicted_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let mut store = LruStore::<String>::new(10).with_on_evicted(Arc::new(move |key: &str, value: &String| {
            sink.lock().unwrap().push((key.to_string(), value.clone()));
        }));

        store.add("key1", "123456".to_string());
        store.add("k2", "k2".to_string());
        store.add("k3", "k3".to_string());
        store.add("k4", "k4".to_string());

        let evicted = evicted.lock().unwrap();
        assert_eq!(
            *evicted,
            vec![
                ("key1".to_string(), "123456".to_string()),
                ("k2".to_string(), "k2".to_string()),
            ]
        );
    }

    #[test]
    fn test_slots_are_reused_after_eviction() {
        let mut store = LruStore::new(8);
        for i in 0..100 {
            store.add(&format!("k{}", i % 10), "vv".to_string());
        }
        assert!(store.slots.len() <= 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_iter_order_after_multiple_gets() {
        let mut store = LruStore::new(0);
        store.add("a", "1".to_string());
        store.add("b", "2".to_string());
        store.add("c", "3".to_string());

        store.get("a");
        store.get("c");
        store.get("b");

        assert_eq!(keys(&store), vec!["b", "c", "a"]);
    }
}
