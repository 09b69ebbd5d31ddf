use std::collections::HashMap;

use crate::key::DependencyKey;
use crate::registry::Instance;

/// Scoped mapping from dependency key to the already-constructed instance.
///
/// Entries are created lazily on first successful resolution and persist
/// until explicitly evicted. When eviction empties a scope's bucket the
/// bucket itself is removed; that is pure housekeeping and not observable
/// through the public API.
#[derive(Default)]
pub(crate) struct SingletonCache {
    scopes: HashMap<String, HashMap<DependencyKey, Instance>>,
}

impl SingletonCache {
    pub fn lookup(&self, key: &DependencyKey, scope: &str) -> Option<Instance> {
        self.scopes.get(scope)?.get(key).cloned()
    }

    pub fn store(&mut self, key: DependencyKey, scope: &str, instance: Instance) {
        self.scopes
            .entry(scope.to_owned())
            .or_default()
            .insert(key, instance);
    }

    /// Removes the entry for (key, scope), returning whether one existed.
    pub fn evict(&mut self, key: &DependencyKey, scope: &str) -> bool {
        let Some(bucket) = self.scopes.get_mut(scope) else {
            return false;
        };
        let removed = bucket.remove(key).is_some();
        if bucket.is_empty() {
            self.scopes.remove(scope);
        }
        removed
    }
}
