//! Relationship resolution.
//!
//! Turns one relationship slot into a [`RelationshipValue`], building the
//! targets through the shared cache.
//!
//! With `allow_circular` left on, the only guard against cycles is the
//! identity cache: a cycle ends when it returns to a `(type, id)` already
//! built. Every distinct entity on a cycle is built once, so the recursion
//! is bounded by the number of records reachable from the root; it is the
//! caller's job to keep that graph a reasonable size or to turn
//! suppression on.

use tracing::{debug, trace};

use denorm_store::RecordSource;
use denorm_types::{EntityRef, RefData, RelationshipSlot};

use crate::builder::build_entity;
use crate::cache::IdentityCache;
use crate::error::{BuildError, BuildResult};
use crate::object::{RelationshipValue, Resolution};
use crate::options::BuildOptions;

/// Resolve the relationship `name` of `owner`.
///
/// `options` are the options for the children, i.e. with `owner`'s type
/// already appended to the ancestor chain when suppression is active.
pub(crate) fn resolve_relationship<S>(
    store: &S,
    cache: &mut IdentityCache,
    owner: &EntityRef,
    name: &str,
    slot: &RelationshipSlot,
    options: &BuildOptions,
) -> BuildResult<RelationshipValue>
where
    S: RecordSource + ?Sized,
{
    match &slot.data {
        RefData::Many(refs) => refs
            .iter()
            .map(|target| resolve_target(store, cache, target, options))
            .collect::<BuildResult<Vec<_>>>()
            .map(RelationshipValue::Many),
        RefData::Single(target) => {
            resolve_target(store, cache, target, options).map(RelationshipValue::One)
        }
        RefData::Null => Ok(RelationshipValue::Null),
        RefData::Absent if slot.has_links() && !options.ignore_links => {
            debug!(owner = %owner, relationship = name, "link-only relationship");
            Err(BuildError::UnresolvedRemoteLink {
                type_name: owner.type_name.clone(),
                id: owner.id.to_string(),
                relationship: name.to_string(),
            })
        }
        RefData::Absent => Ok(RelationshipValue::Omitted),
    }
}

fn resolve_target<S>(
    store: &S,
    cache: &mut IdentityCache,
    target: &EntityRef,
    options: &BuildOptions,
) -> BuildResult<Resolution>
where
    S: RecordSource + ?Sized,
{
    if options.suppresses(&target.type_name) {
        trace!(target = %target, "suppressed circular reference");
        return Ok(Resolution::Unresolved(target.clone()));
    }

    Ok(
        match build_entity(store, &target.type_name, &target.id, options, cache)? {
            Some(handle) => Resolution::Object(handle),
            None => Resolution::Unresolved(target.clone()),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use denorm_store::NormalizedStore;
    use denorm_types::Record;
    use serde_json::json;

    fn store() -> NormalizedStore {
        let mut store = NormalizedStore::new();
        store.insert("people", "1", Record::new("1").with_attribute("name", json!("a")));
        store.insert("people", "2", Record::new("2").with_attribute("name", json!("b")));
        store
    }

    fn owner() -> EntityRef {
        EntityRef::new("posts", "9")
    }

    fn resolve(
        cache: &mut IdentityCache,
        slot: &RelationshipSlot,
        options: &BuildOptions,
    ) -> BuildResult<RelationshipValue> {
        resolve_relationship(&store(), cache, &owner(), "rel", slot, options)
    }

    #[test]
    fn many_keeps_order_and_falls_back_to_refs() {
        let mut cache = IdentityCache::new();
        let slot = RelationshipSlot::with_data(RefData::Many(vec![
            EntityRef::new("people", "2"),
            EntityRef::new("people", "404"),
            EntityRef::new("people", "1"),
        ]));
        let value = resolve(&mut cache, &slot, &BuildOptions::default()).unwrap();
        let RelationshipValue::Many(items) = value else {
            panic!("expected many");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_object(), cache.handle("people", "2"));
        assert_eq!(items[1], Resolution::Unresolved(EntityRef::new("people", "404")));
        assert_eq!(items[2].as_object(), cache.handle("people", "1"));
    }

    #[test]
    fn single_target() {
        let mut cache = IdentityCache::new();
        let slot = RelationshipSlot::with_data(RefData::Single(EntityRef::new("people", "1")));
        let value = resolve(&mut cache, &slot, &BuildOptions::default()).unwrap();
        assert_eq!(
            value,
            RelationshipValue::One(Resolution::Object(cache.handle("people", "1").unwrap()))
        );
    }

    #[test]
    fn unknown_target_type_stays_a_ref() {
        let mut cache = IdentityCache::new();
        let slot = RelationshipSlot::with_data(RefData::Single(EntityRef::new("robots", "1")));
        let value = resolve(&mut cache, &slot, &BuildOptions::default()).unwrap();
        assert_eq!(
            value,
            RelationshipValue::One(Resolution::Unresolved(EntityRef::new("robots", "1")))
        );
    }

    #[test]
    fn null_data_is_null() {
        let mut cache = IdentityCache::new();
        let slot = RelationshipSlot::with_data(RefData::Null);
        assert_eq!(
            resolve(&mut cache, &slot, &BuildOptions::default()).unwrap(),
            RelationshipValue::Null
        );
    }

    #[test]
    fn absent_data_without_links_is_omitted() {
        let mut cache = IdentityCache::new();
        let slot = RelationshipSlot::default();
        assert_eq!(
            resolve(&mut cache, &slot, &BuildOptions::default()).unwrap(),
            RelationshipValue::Omitted
        );
    }

    #[test]
    fn link_only_fails_unless_ignored() {
        let mut cache = IdentityCache::new();
        let links = json!({"related": "/posts/9/rel"}).as_object().cloned().unwrap();
        let slot = RelationshipSlot::links_only(links);

        let err = resolve(&mut cache, &slot, &BuildOptions::default()).unwrap_err();
        match err {
            BuildError::UnresolvedRemoteLink { type_name, id, relationship } => {
                assert_eq!(type_name, "posts");
                assert_eq!(id, "9");
                assert_eq!(relationship, "rel");
            }
            other => panic!("unexpected error: {other}"),
        }

        let ignored = BuildOptions::new().ignore_links(true);
        assert_eq!(resolve(&mut cache, &slot, &ignored).unwrap(), RelationshipValue::Omitted);
    }

    #[test]
    fn suppression_returns_raw_refs_for_ancestor_types() {
        let mut cache = IdentityCache::new();
        let slot = RelationshipSlot::with_data(RefData::Single(EntityRef::new("people", "1")));
        let options = BuildOptions::new()
            .allow_circular(false)
            .ancestor_types(["people"]);
        assert_eq!(
            resolve(&mut cache, &slot, &options).unwrap(),
            RelationshipValue::One(Resolution::Unresolved(EntityRef::new("people", "1")))
        );
        assert!(cache.is_empty());
    }
}
