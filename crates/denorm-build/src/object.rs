//! Built output objects.
//!
//! Objects live in an [`IdentityCache`](crate::IdentityCache) and refer to
//! each other through [`ObjectHandle`]s, so cyclic graphs need no reference
//! counting and two handles are equal exactly when they name the same
//! instance.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use denorm_types::{EntityId, EntityRef, JsonMap, Record, RelationshipSlot};

use crate::options::BuildOptions;

/// Index of a built object within its cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub(crate) usize);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a resolved relationship.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The target was built (or found in the cache).
    Object(ObjectHandle),
    /// The target was suppressed as circular or is missing from the store.
    Unresolved(EntityRef),
}

impl Resolution {
    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Self::Object(h) => Some(*h),
            Self::Unresolved(_) => None,
        }
    }
}

/// The value a relationship resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationshipValue {
    /// No embedded data and no link to follow (or links ignored).
    Omitted,
    /// Embedded data was explicitly `null`.
    Null,
    One(Resolution),
    Many(Vec<Resolution>),
}

/// A relationship whose resolution has been deferred to first read.
#[derive(Clone, Debug)]
pub(crate) struct PendingRelationship {
    pub slot: RelationshipSlot,
    /// Options for the children, ancestor chain already extended.
    pub options: Rc<BuildOptions>,
}

#[derive(Clone, Debug)]
pub(crate) enum RelationshipState {
    Pending(PendingRelationship),
    Resolved(RelationshipValue),
}

/// A denormalized entity.
///
/// Holds the projected fields (`id`, attributes, and `type` when requested),
/// optional meta, and one entry per relationship of the source record.
#[derive(Clone, Debug)]
pub struct BuiltObject {
    type_name: String,
    requested_id: EntityId,
    pub(crate) fields: JsonMap,
    pub(crate) meta: Option<JsonMap>,
    pub(crate) relationships: BTreeMap<String, RelationshipState>,
}

impl BuiltObject {
    /// Project a record's own fields. Relationships are attached later.
    pub(crate) fn project(
        type_name: &str,
        requested_id: &EntityId,
        record: &Record,
        options: &BuildOptions,
    ) -> Self {
        let mut fields = JsonMap::new();
        if let Some(id) = record.own_id() {
            fields.insert("id".into(), id.to_value());
        }
        fields.extend(record.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));

        let meta = if options.include_meta {
            record.meta.clone()
        } else {
            None
        };

        if options.include_type && !fields.contains_key("type") {
            fields.insert("type".into(), Value::String(type_name.to_string()));
        }

        if !fields.contains_key("id") {
            fields.insert("id".into(), Value::String(requested_id.as_key().into_owned()));
        }

        Self {
            type_name: type_name.to_string(),
            requested_id: requested_id.clone(),
            fields,
            meta,
            relationships: BTreeMap::new(),
        }
    }

    /// The entity's type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The output `id`: the record's own id, else the requested id as a string.
    pub fn id(&self) -> &Value {
        // Always set by `project`; an attribute may replace it but not remove it.
        self.fields.get("id").unwrap_or(&Value::Null)
    }

    /// A reference to this entity, keyed by the id it was requested with.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.type_name.clone(), self.requested_id.clone())
    }

    /// A projected field (`id`, an attribute, or `type`).
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All projected fields.
    pub fn fields(&self) -> &JsonMap {
        &self.fields
    }

    pub fn meta(&self) -> Option<&JsonMap> {
        self.meta.as_ref()
    }

    /// Names of the relationships this object carries, resolved or not.
    pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships.contains_key(name)
    }

    /// Whether a relationship has been resolved yet.
    pub fn is_resolved(&self, name: &str) -> bool {
        matches!(
            self.relationships.get(name),
            Some(RelationshipState::Resolved(_))
        )
    }

    /// A relationship's value if it is already resolved. Never resolves.
    pub fn resolved(&self, name: &str) -> Option<&RelationshipValue> {
        match self.relationships.get(name)? {
            RelationshipState::Resolved(value) => Some(value),
            RelationshipState::Pending(_) => None,
        }
    }
}

/// Result of a top-level build request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Built {
    /// Unknown type, or a single id with no record.
    None,
    One(ObjectHandle),
    /// One entry per requested id, in request order; `None` where the
    /// record is missing.
    Many(Vec<Option<ObjectHandle>>),
}

impl Built {
    pub fn as_one(&self) -> Option<ObjectHandle> {
        match self {
            Self::One(h) => Some(*h),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Option<ObjectHandle>]> {
        match self {
            Self::Many(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
