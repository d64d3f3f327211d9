//! A store, default options and one identity cache bundled together.
//!
//! [`Denormalizer`] is the convenient surface for callers that build several
//! times against the same store and want every call to share objects.

use serde_json::Value;

use denorm_store::RecordSource;
use denorm_types::IdSelector;

use crate::builder::build;
use crate::cache::{CacheStats, IdentityCache};
use crate::error::{BuildError, BuildResult};
use crate::object::{Built, BuiltObject, ObjectHandle, RelationshipValue};
use crate::options::BuildOptions;
use crate::render::{built_to_json, object_to_json};

/// A store paired with default options and one identity cache.
///
/// Every build through the same `Denormalizer` shares its cache, so an
/// entity requested by several calls is built once. Call
/// [`reset`](Self::reset) to start a fresh cache lifetime.
pub struct Denormalizer<'s, S: RecordSource + ?Sized> {
    store: &'s S,
    options: BuildOptions,
    cache: IdentityCache,
}

impl<'s, S: RecordSource + ?Sized> Denormalizer<'s, S> {
    /// A denormalizer with default options.
    pub fn new(store: &'s S) -> Self {
        Self::with_options(store, BuildOptions::default())
    }

    pub fn with_options(store: &'s S, options: BuildOptions) -> Self {
        Self {
            store,
            options,
            cache: IdentityCache::new(),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build with this denormalizer's options.
    pub fn build(&mut self, type_name: &str, ids: impl Into<IdSelector>) -> BuildResult<Built> {
        build(self.store, type_name, &ids.into(), &self.options, &mut self.cache)
    }

    /// Build with one-off options. Objects already in the cache are
    /// returned as built, whatever `options` say.
    pub fn build_with(
        &mut self,
        type_name: &str,
        ids: impl Into<IdSelector>,
        options: &BuildOptions,
    ) -> BuildResult<Built> {
        build(self.store, type_name, &ids.into(), options, &mut self.cache)
    }

    /// Build one entity and return its handle, `None` if it does not exist.
    pub fn build_one(&mut self, type_name: &str, id: &str) -> BuildResult<Option<ObjectHandle>> {
        Ok(self.build(type_name, IdSelector::one(id))?.as_one())
    }

    pub fn object(&self, handle: ObjectHandle) -> BuildResult<&BuiltObject> {
        self.cache.get(handle).ok_or(BuildError::UnknownObject(handle))
    }

    /// Read a relationship, resolving it on first access.
    pub fn relationship(
        &mut self,
        handle: ObjectHandle,
        name: &str,
    ) -> BuildResult<&RelationshipValue> {
        self.cache.relationship(self.store, handle, name)
    }

    /// Read a to-one relationship that resolved to an object.
    pub fn related(
        &mut self,
        handle: ObjectHandle,
        name: &str,
    ) -> BuildResult<Option<ObjectHandle>> {
        Ok(match self.relationship(handle, name)? {
            RelationshipValue::One(target) => target.as_object(),
            _ => None,
        })
    }

    /// Render an object, resolving every reachable relationship.
    pub fn to_json(&mut self, handle: ObjectHandle) -> BuildResult<Value> {
        object_to_json(self.store, &mut self.cache, handle)
    }

    pub fn built_to_json(&mut self, built: &Built) -> BuildResult<Value> {
        built_to_json(self.store, &mut self.cache, built)
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every built object and start a new cache lifetime.
    pub fn reset(&mut self) {
        self.cache = IdentityCache::new();
    }

    /// Take the cache, ending this session.
    pub fn into_cache(self) -> IdentityCache {
        self.cache
    }
}
