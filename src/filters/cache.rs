use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct CacheEntries {
    namespaces: Vec<String>,
    kinds: Vec<String>,
    names: HashMap<(String, String), Vec<String>>,
}

/// Session-wide autocomplete data fed by the discovery collaborator.
///
/// There is no eviction: callers invalidate with [`AutocompleteCache::clear`].
/// All reads and writes go through a single lock.
#[derive(Debug, Default)]
pub struct AutocompleteCache {
    entries: RwLock<CacheEntries>,
}

impl AutocompleteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.entries.read().namespaces.clone()
    }

    pub fn set_namespaces(&self, namespaces: Vec<String>) {
        debug!("Caching {} namespaces", namespaces.len());
        self.entries.write().namespaces = namespaces;
    }

    pub fn kinds(&self) -> Vec<String> {
        self.entries.read().kinds.clone()
    }

    pub fn set_kinds(&self, kinds: Vec<String>) {
        debug!("Caching {} kinds", kinds.len());
        self.entries.write().kinds = kinds;
    }

    /// Names known for a kind in a namespace, if that pair was ever cached
    pub fn names(&self, kind: &str, namespace: &str) -> Option<Vec<String>> {
        self.entries
            .read()
            .names
            .get(&(kind.to_string(), namespace.to_string()))
            .cloned()
    }

    pub fn set_names(&self, kind: &str, namespace: &str, names: Vec<String>) {
        debug!("Caching {} names for {}.{}", names.len(), kind, namespace);
        self.entries
            .write()
            .names
            .insert((kind.to_string(), namespace.to_string()), names);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.namespaces.clear();
        entries.kinds.clear();
        entries.names.clear();
    }
}
