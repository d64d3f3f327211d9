use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::EntityId;

/// A `(type, id)` pointer to an entity.
///
/// Appears as relationship data in records, and in built output wherever a
/// relationship was left unresolved (suppressed cycle or missing target).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub type_name: String,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(type_name: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    /// Render as a `{"type": .., "id": ..}` JSON object.
    pub fn to_value(&self) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("type".into(), Value::String(self.type_name.clone()));
        obj.insert("id".into(), self.id.to_value());
        Value::Object(obj)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.id)
    }
}

/// The embedded data of a relationship.
///
/// `Absent` and `Null` are distinct: `Absent` means the data was never
/// embedded (only links may be available), `Null` means the relationship is
/// known to be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RefData {
    #[default]
    Absent,
    Null,
    Single(EntityRef),
    Many(Vec<EntityRef>),
}

impl RefData {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<EntityRef>),
    Single(EntityRef),
}

impl Serialize for RefData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Absent is skipped by the containing slot; a bare Absent renders as null.
            Self::Absent | Self::Null => serializer.serialize_none(),
            Self::Single(r) => r.serialize(serializer),
            Self::Many(refs) => refs.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RefData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A missing field never reaches here (the slot defaults it to Absent),
        // so a present `null` is an explicit empty relationship.
        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Self::Null,
            Some(OneOrMany::Single(r)) => Self::Single(r),
            Some(OneOrMany::Many(refs)) => Self::Many(refs),
        })
    }
}
