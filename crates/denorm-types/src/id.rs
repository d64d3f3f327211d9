use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of an entity within its type.
///
/// Stores key records by the string form of their id, but references and
/// records may carry numeric ids. Both forms are kept as given so the
/// output can echo the record's own id unchanged; lookups always go through
/// [`EntityId::as_key`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Text(String),
    Number(serde_json::Number),
}

impl EntityId {
    /// The string form used as a store key.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Whether this id carries no usable value (an empty string).
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// The id as a JSON value, preserving its textual or numeric form.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Which ids of a type a build request covers.
///
/// `All` enumerates the store's ids for the type in the store's natural
/// order; `Many` keeps the caller's order, duplicates included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdSelector {
    #[default]
    All,
    One(EntityId),
    Many(Vec<EntityId>),
}

impl IdSelector {
    pub fn one(id: impl Into<EntityId>) -> Self {
        Self::One(id.into())
    }

    pub fn many<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        Self::Many(ids.into_iter().map(Into::into).collect())
    }
}

impl From<EntityId> for IdSelector {
    fn from(id: EntityId) -> Self {
        Self::One(id)
    }
}

impl From<&str> for IdSelector {
    fn from(id: &str) -> Self {
        Self::One(id.into())
    }
}

impl From<Vec<EntityId>> for IdSelector {
    fn from(ids: Vec<EntityId>) -> Self {
        Self::Many(ids)
    }
}

impl From<Option<EntityId>> for IdSelector {
    fn from(id: Option<EntityId>) -> Self {
        id.map_or(Self::All, Self::One)
    }
}
