//! Consistent Hash Ring
//!
//! Maps keys to node identifiers over a circular 32-bit hash space. Each real
//! node is placed on the ring `replicas` times (virtual nodes) so that load
//! spreads evenly even with few nodes.
//!
//! ```text
//!   0 ──── v(B,1) ──── v(A,0) ──── v(B,0) ──── v(A,1) ──── u32::MAX ─┐
//!   ▲                                                                │
//!   └──────────────────────────── wraps ─────────────────────────────┘
//! ```
//!
//! A key belongs to the first virtual node at or after its own hash; keys
//! hashing past the last virtual node wrap to the first one.
//!
//! The ring is built during setup (`add_nodes` takes `&mut self`) and then
//! shared read-only; it has no internal lock.

use std::collections::{BTreeSet, HashMap};

use xxhash_rust::xxh32::xxh32;

/// Hash function used to place keys and virtual nodes on the ring.
pub type HashFn = fn(&[u8]) -> u32;

/// Default number of virtual nodes per real node.
pub const DEFAULT_REPLICAS: usize = 50;

fn default_hash(data: &[u8]) -> u32 {
    xxh32(data, 0)
}

// == Hash Ring ==
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Virtual node hashes, ascending
    positions: Vec<u32>,
    /// Virtual node hash → real node
    owners: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring using 32-bit xxHash.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, default_hash)
    }

    /// Creates an empty ring with a custom hash function.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add Nodes ==
    /// Places `replicas` virtual nodes for each name on the ring.
    ///
    /// Virtual node `i` of `name` sits at `hash(format!("{i}{name}"))`. Two
    /// virtual nodes hashing to the same position keep the later owner.
    pub fn add_nodes<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.positions.push(position);
                self.owners.insert(position, node.to_string());
            }
        }
        self.positions.sort_unstable();
    }

    // == Get Node ==
    /// Returns the node owning `key`, or None if the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let mut idx = self.positions.partition_point(|&position| position < hash);
        if idx == self.positions.len() {
            idx = 0;
        }

        self.owners
            .get(&self.positions[idx])
            .map(String::as_str)
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Distinct real nodes, sorted.
    pub fn nodes(&self) -> Vec<&str> {
        self.owners
            .values()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}
