//! Relationship meta attachment.

use serde_json::Value;

use denorm_types::{JsonMap, RelationshipSlot};

use crate::object::BuiltObject;

/// Copy a relationship slot's meta to `meta.relationships[name]` on the
/// object, creating the containers on first use. Slots without meta leave
/// the object untouched.
pub(crate) fn attach_relationship_meta(
    object: &mut BuiltObject,
    name: &str,
    slot: &RelationshipSlot,
) {
    let Some(slot_meta) = &slot.meta else {
        return;
    };

    let meta = object.meta.get_or_insert_with(JsonMap::new);
    let relationships = meta
        .entry("relationships")
        .or_insert_with(|| Value::Object(JsonMap::new()));
    if !relationships.is_object() {
        *relationships = Value::Object(JsonMap::new());
    }
    if let Value::Object(by_name) = relationships {
        by_name.insert(name.to_string(), Value::Object(slot_meta.clone()));
    }
}
