//! The identity cache.
//!
//! Owns every object built during its lifetime and maps each `(type, id)`
//! key to the one instance built for it. Entries are only ever added; a
//! cache is dropped as a whole once its objects are no longer needed.
//!
//! A cached object is returned for a repeated key even if the options of
//! the later request differ from those it was built with (for example
//! `include_meta` toggled between calls). Callers sharing a cache across
//! requests should keep their options consistent.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use denorm_store::RecordSource;

use crate::error::{BuildError, BuildResult};
use crate::meta::attach_relationship_meta;
use crate::object::{BuiltObject, ObjectHandle, RelationshipState, RelationshipValue};
use crate::resolver::resolve_relationship;

/// Composite `(type, id)` key of a cached object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub type_name: String,
    pub id: String,
}

impl CacheKey {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.id)
    }
}

/// Counters describing cache activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered with an existing object.
    pub hits: u64,
    /// Objects constructed.
    pub builds: u64,
    /// Relationships resolved, eagerly or on first read.
    pub resolutions: u64,
}

/// Arena of built objects plus the `(type, id)` index over it.
#[derive(Default)]
pub struct IdentityCache {
    objects: Vec<BuiltObject>,
    index: HashMap<CacheKey, ObjectHandle>,
    stats: CacheStats,
}

impl IdentityCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects in the cache.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Handle of the object cached for `(type_name, id)`, if any.
    pub fn handle(&self, type_name: &str, id: &str) -> Option<ObjectHandle> {
        self.index.get(&CacheKey::new(type_name, id)).copied()
    }

    /// Borrow a built object.
    pub fn get(&self, handle: ObjectHandle) -> Option<&BuiltObject> {
        self.objects.get(handle.0)
    }

    pub(crate) fn object(&self, handle: ObjectHandle) -> BuildResult<&BuiltObject> {
        self.objects
            .get(handle.0)
            .ok_or(BuildError::UnknownObject(handle))
    }

    pub(crate) fn object_mut(&mut self, handle: ObjectHandle) -> BuildResult<&mut BuiltObject> {
        self.objects
            .get_mut(handle.0)
            .ok_or(BuildError::UnknownObject(handle))
    }

    /// Look up a key, counting a hit when found.
    pub(crate) fn lookup(&mut self, key: &CacheKey) -> Option<ObjectHandle> {
        let found = self.index.get(key).copied();
        if found.is_some() {
            self.stats.hits += 1;
        }
        found
    }

    /// Register a new object under `key`.
    ///
    /// Keys are never overwritten: callers check [`lookup`](Self::lookup)
    /// first, and a second insert for the same key returns the existing
    /// handle without storing the new object.
    pub(crate) fn insert(&mut self, key: CacheKey, object: BuiltObject) -> ObjectHandle {
        if let Some(existing) = self.index.get(&key) {
            return *existing;
        }
        let handle = ObjectHandle(self.objects.len());
        self.objects.push(object);
        self.index.insert(key, handle);
        self.stats.builds += 1;
        handle
    }

    pub(crate) fn record_resolution(&mut self) {
        self.stats.resolutions += 1;
    }

    /// Read a relationship, resolving it on first access.
    ///
    /// A pending relationship is resolved once and the value is stored on
    /// the object; later reads return the stored value without touching the
    /// store. If resolution fails the relationship stays pending and the
    /// error is returned.
    pub fn relationship<S>(
        &mut self,
        store: &S,
        handle: ObjectHandle,
        name: &str,
    ) -> BuildResult<&RelationshipValue>
    where
        S: RecordSource + ?Sized,
    {
        let object = self.object(handle)?;
        let pending = match object.relationships.get(name) {
            Some(RelationshipState::Pending(pending)) => Some(pending.clone()),
            Some(RelationshipState::Resolved(_)) => None,
            None => {
                return Err(BuildError::UnknownRelationship {
                    type_name: object.type_name().to_string(),
                    id: object.entity_ref().id.to_string(),
                    relationship: name.to_string(),
                });
            }
        };

        if let Some(pending) = pending {
            let owner = self.object(handle)?.entity_ref();
            trace!(owner = %owner, relationship = name, "resolving relationship");
            let value =
                resolve_relationship(store, self, &owner, name, &pending.slot, &pending.options)?;
            self.record_resolution();

            let object = self.object_mut(handle)?;
            if pending.options.include_meta {
                attach_relationship_meta(object, name, &pending.slot);
            }
            object
                .relationships
                .insert(name.to_string(), RelationshipState::Resolved(value));
        }

        match self.object(handle)?.relationships.get(name) {
            Some(RelationshipState::Resolved(value)) => Ok(value),
            _ => Err(BuildError::UnknownObject(handle)),
        }
    }
}

impl fmt::Debug for IdentityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("object_count", &self.objects.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BuildOptions;
    use denorm_types::Record;

    fn object(type_name: &str, id: &str) -> BuiltObject {
        BuiltObject::project(type_name, &id.into(), &Record::new(id), &BuildOptions::default())
    }

    #[test]
    fn insert_then_lookup() {
        let mut cache = IdentityCache::new();
        let key = CacheKey::new("people", "1");
        assert!(cache.lookup(&key).is_none());

        let h = cache.insert(key.clone(), object("people", "1"));
        assert_eq!(cache.lookup(&key), Some(h));
        assert_eq!(cache.handle("people", "1"), Some(h));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, builds: 1, resolutions: 0 });
    }

    #[test]
    fn keys_are_never_overwritten() {
        let mut cache = IdentityCache::new();
        let first = cache.insert(CacheKey::new("people", "1"), object("people", "1"));
        let second = cache.insert(CacheKey::new("people", "1"), object("people", "1"));
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn composite_keys_do_not_collide() {
        let mut cache = IdentityCache::new();
        let a = cache.insert(CacheKey::new("people", "1"), object("people", "1"));
        let b = cache.insert(CacheKey::new("people1", ""), object("people1", ""));
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_handle() {
        let cache = IdentityCache::new();
        assert!(cache.get(ObjectHandle(3)).is_none());
        assert!(matches!(
            cache.object(ObjectHandle(3)),
            Err(BuildError::UnknownObject(_))
        ));
    }

    #[test]
    fn unknown_relationship() {
        let mut cache = IdentityCache::new();
        let store = denorm_store::NormalizedStore::new();
        let h = cache.insert(CacheKey::new("people", "1"), object("people", "1"));
        assert!(matches!(
            cache.relationship(&store, h, "friends"),
            Err(BuildError::UnknownRelationship { .. })
        ));
    }
}
