use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::EntityId;
use crate::reference::RefData;
use crate::JsonMap;

/// One named relationship of a record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSlot {
    #[serde(default, skip_serializing_if = "RefData::is_absent")]
    pub data: RefData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonMap>,
}

impl RelationshipSlot {
    pub fn with_data(data: RefData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// A slot that only offers links, with no embedded data.
    pub fn links_only(links: JsonMap) -> Self {
        Self {
            links: Some(links),
            ..Self::default()
        }
    }

    pub fn has_links(&self) -> bool {
        self.links.is_some()
    }
}

/// A stored entity.
///
/// `attributes` is required: a record without it is malformed and is
/// rejected when deserialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub attributes: JsonMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, RelationshipSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonMap>,
}

impl Record {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, slot: RelationshipSlot) -> Self {
        self.relationships.insert(name.into(), slot);
        self
    }

    pub fn with_meta(mut self, meta: JsonMap) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The record's own id, if it carries a usable one.
    pub fn own_id(&self) -> Option<&EntityId> {
        self.id.as_ref().filter(|id| !id.is_blank())
    }
}
