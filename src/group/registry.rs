//! Group Registry
//!
//! Name → group mapping shared by everything that creates or resolves groups.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::{Group, Loader};

// == Registry ==
/// Registered groups, keyed by name.
///
/// Lookups take a shared lock and registrations an exclusive one. Groups are
/// never removed; registering a name again replaces the previous group.
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Creates a group with a fresh cache of `cache_bytes` (0 = unbounded)
    /// and makes it visible under `name`.
    pub fn register(
        &self,
        name: impl Into<String>,
        cache_bytes: u64,
        loader: impl Loader + 'static,
    ) -> Arc<Group> {
        let name = name.into();
        let group = Arc::new(Group::new(name.clone(), cache_bytes, loader));

        let previous = self
            .groups
            .write()
            .insert(name.clone(), Arc::clone(&group));

        if previous.is_some() {
            warn!(group = %name, cache_bytes, "replaced existing group");
        } else {
            info!(group = %name, cache_bytes, "registered group");
        }
        group
    }

    // == Lookup ==
    /// Returns the group registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn echo(key: &str) -> anyhow::Result<Vec<u8>> {
        Ok(key.as_bytes().to_vec())
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("scores").is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new();
        let group = registry.register("scores", 1024, echo);

        let found = registry.lookup("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &found));
        assert_eq!(found.name(), "scores");
        assert_eq!(found.cache_bytes(), 1024);
        assert_eq!(found.get("tom").unwrap().to_string(), "tom");
    }

    #[test]
    fn test_register_same_name_replaces_group() {
        let registry = Registry::new();
        let first = registry.register("scores", 10, echo);
        let second = registry.register("scores", 20, echo);

        let found = registry.lookup("scores").unwrap();
        assert!(Arc::ptr_eq(&second, &found));
        assert!(!Arc::ptr_eq(&first, &found));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = Registry::new();
        registry.register("b", 0, echo);
        registry.register("a", 0, echo);
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_lookups_during_registration() {
        let registry = Arc::new(Registry::new());
        registry.register("base", 0, echo);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        registry.register(format!("group{}", i), 0, echo);
                    }
                    registry.lookup("base").is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(registry.len(), 5);
    }
}
