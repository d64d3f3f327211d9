//! Rendering built objects as JSON.
//!
//! Rendering reads every relationship, so deferred relationships reachable
//! from the rendered object are resolved (and stay resolved in the cache).
//! An object that is already being rendered higher up the same path is
//! written as its `{type, id}` reference; shared objects reached along
//! different paths are written out in full each time.

use serde_json::Value;

use denorm_store::RecordSource;

use crate::cache::IdentityCache;
use crate::error::BuildResult;
use crate::object::{Built, ObjectHandle, RelationshipValue, Resolution};

/// Render one object and everything reachable from it.
///
/// The output is a tree, so an object reachable along several paths is
/// copied once per path. On a graph of stacked diamonds (each layer
/// pointing twice at the next) the output doubles with every layer even
/// though the cache holds one object per entity. Walk the handles through
/// [`IdentityCache::relationship`] instead when the graph is shared that
/// heavily.
pub fn object_to_json<S>(
    store: &S,
    cache: &mut IdentityCache,
    handle: ObjectHandle,
) -> BuildResult<Value>
where
    S: RecordSource + ?Sized,
{
    let mut path = Vec::new();
    render_object(store, cache, handle, &mut path)
}

/// Render a build result: `null`, an object, or an array of objects.
pub fn built_to_json<S>(store: &S, cache: &mut IdentityCache, built: &Built) -> BuildResult<Value>
where
    S: RecordSource + ?Sized,
{
    match built {
        Built::None => Ok(Value::Null),
        Built::One(handle) => object_to_json(store, cache, *handle),
        Built::Many(items) => items
            .iter()
            .map(|item| match item {
                Some(handle) => object_to_json(store, cache, *handle),
                None => Ok(Value::Null),
            })
            .collect::<BuildResult<Vec<_>>>()
            .map(Value::Array),
    }
}

fn render_object<S>(
    store: &S,
    cache: &mut IdentityCache,
    handle: ObjectHandle,
    path: &mut Vec<ObjectHandle>,
) -> BuildResult<Value>
where
    S: RecordSource + ?Sized,
{
    if path.contains(&handle) {
        return Ok(cache.object(handle)?.entity_ref().to_value());
    }

    let names: Vec<String> = cache
        .object(handle)?
        .relationship_names()
        .map(str::to_string)
        .collect();
    let mut values = Vec::with_capacity(names.len());
    for name in names {
        let value = cache.relationship(store, handle, &name)?.clone();
        values.push((name, value));
    }

    let object = cache.object(handle)?;
    let mut out = object.fields().clone();
    if let Some(meta) = object.meta() {
        out.insert("meta".into(), Value::Object(meta.clone()));
    }

    path.push(handle);
    for (name, value) in values {
        let rendered = match value {
            RelationshipValue::Omitted => continue,
            RelationshipValue::Null => Value::Null,
            RelationshipValue::One(target) => render_resolution(store, cache, &target, path)?,
            RelationshipValue::Many(targets) => Value::Array(
                targets
                    .iter()
                    .map(|target| render_resolution(store, cache, target, path))
                    .collect::<BuildResult<Vec<_>>>()?,
            ),
        };
        out.insert(name, rendered);
    }
    path.pop();

    Ok(Value::Object(out))
}

fn render_resolution<S>(
    store: &S,
    cache: &mut IdentityCache,
    target: &Resolution,
    path: &mut Vec<ObjectHandle>,
) -> BuildResult<Value>
where
    S: RecordSource + ?Sized,
{
    match target {
        Resolution::Object(handle) => render_object(store, cache, *handle, path),
        Resolution::Unresolved(reference) => Ok(reference.to_value()),
    }
}
