//! The object builder.
//!
//! [`build`] is the entry point: it resolves an [`IdSelector`] to one or
//! more objects, all built through the same [`IdentityCache`].
//!
//! Each object is registered in the cache before its relationships are
//! touched, so a relationship that leads back to the same `(type, id)`
//! receives the object under construction instead of recursing again.

use std::rc::Rc;

use tracing::{debug, trace};

use denorm_store::RecordSource;
use denorm_types::{EntityId, IdSelector};

use crate::cache::{CacheKey, IdentityCache};
use crate::error::BuildResult;
use crate::object::{Built, BuiltObject, ObjectHandle, PendingRelationship, RelationshipState};
use crate::options::BuildOptions;

/// Build the objects selected by `ids` from `type_name`.
///
/// - An unknown type yields [`Built::None`] whatever the selector.
/// - [`IdSelector::All`] builds every id of the type in the store's order;
///   [`IdSelector::Many`] builds the listed ids in the given order. Both
///   yield [`Built::Many`], with `None` for ids that have no record.
/// - [`IdSelector::One`] yields [`Built::One`], or [`Built::None`] when the
///   record is missing.
///
/// Fails only when a relationship resolved during the build is link-only
/// and `ignore_links` is off; with lazy resolution that can only happen
/// on a later read.
pub fn build<S>(
    store: &S,
    type_name: &str,
    ids: &IdSelector,
    options: &BuildOptions,
    cache: &mut IdentityCache,
) -> BuildResult<Built>
where
    S: RecordSource + ?Sized,
{
    if !store.contains_type(type_name) {
        debug!(type_name, "unknown type");
        return Ok(Built::None);
    }

    let list = match ids {
        IdSelector::One(id) => {
            return Ok(build_entity(store, type_name, id, options, cache)?
                .map_or(Built::None, Built::One));
        }
        IdSelector::All => store.ids(type_name),
        IdSelector::Many(ids) => ids.clone(),
    };

    list.iter()
        .map(|id| build_entity(store, type_name, id, options, cache))
        .collect::<BuildResult<Vec<_>>>()
        .map(Built::Many)
}

/// Build (or fetch from the cache) the single entity `(type_name, id)`.
///
/// Returns `Ok(None)` when the type or record does not exist.
pub(crate) fn build_entity<S>(
    store: &S,
    type_name: &str,
    id: &EntityId,
    options: &BuildOptions,
    cache: &mut IdentityCache,
) -> BuildResult<Option<ObjectHandle>>
where
    S: RecordSource + ?Sized,
{
    if !store.contains_type(type_name) {
        return Ok(None);
    }

    let key = CacheKey::new(type_name, id.as_key());
    if let Some(handle) = cache.lookup(&key) {
        trace!(key = %key, "identity cache hit");
        return Ok(Some(handle));
    }

    let Some(record) = store.record(type_name, &key.id) else {
        debug!(key = %key, "record not found");
        return Ok(None);
    };

    let mut object = BuiltObject::project(type_name, id, record, options);
    let shared = Rc::new(options.descend(type_name));
    for (name, slot) in &record.relationships {
        object.relationships.insert(
            name.clone(),
            RelationshipState::Pending(PendingRelationship {
                slot: slot.clone(),
                options: Rc::clone(&shared),
            }),
        );
    }
    let handle = cache.insert(key, object);

    if !options.eager {
        trace!(handle = %handle, "built with deferred relationships");
        return Ok(Some(handle));
    }

    // A failure leaves this and the remaining relationships pending, so a
    // later read retries them instead of finding them missing.
    for name in record.relationships.keys() {
        cache.relationship(store, handle, name)?;
    }
    trace!(handle = %handle, "built eagerly");
    Ok(Some(handle))
}
