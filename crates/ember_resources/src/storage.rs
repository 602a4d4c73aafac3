use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use std::sync::Arc;

use ember_core::ResourceError;

// Internal data structure, protected by a lock.
struct StorageInner<H: Key, T> {
    map: SlotMap<H, Arc<T>>,
    lookup: FxHashMap<String, H>,
}

impl<H: Key, T> Default for StorageInner<H, T> {
    fn default() -> Self {
        Self {
            map: SlotMap::default(),
            lookup: FxHashMap::default(),
        }
    }
}

/// Thread-safe, name-addressed store of immutable resources.
///
/// Resources are handed out as `Arc<T>`; nothing in the store is ever
/// mutated after insertion, so readers on any thread see a stable value.
pub struct ResourceStorage<H: Key, T> {
    kind: &'static str,
    inner: RwLock<StorageInner<H, T>>,
}

impl<H: Key, T> ResourceStorage<H, T> {
    /// `kind` names the resource type in error messages ("Mesh", "Material", ...).
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            inner: RwLock::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// [Write] Adds a named resource. Names are unique per storage.
    pub fn add(&self, name: &str, asset: impl Into<T>) -> Result<H, ResourceError> {
        let mut guard = self.inner.write();
        if guard.lookup.contains_key(name) {
            return Err(ResourceError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        let handle = guard.map.insert(Arc::new(asset.into()));
        guard.lookup.insert(name.to_string(), handle);
        Ok(handle)
    }

    /// [Read] Gets a single resource.
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        let guard = self.inner.read();
        guard.map.get(handle).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<T>> {
        let guard = self.inner.read();
        let handle = guard.lookup.get(name)?;
        guard.map.get(*handle).cloned()
    }

    /// Like [`get_by_name`](Self::get_by_name), but a missing name is a load error.
    pub fn require(&self, name: &str) -> Result<Arc<T>, ResourceError> {
        self.get_by_name(name).ok_or_else(|| ResourceError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
