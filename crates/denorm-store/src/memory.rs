use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use denorm_types::{EntityId, Record};

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordSource;

/// In-memory normalized store: type name -> id key -> record.
///
/// Both levels are `BTreeMap`s, so type names and ids enumerate in
/// ascending lexicographic order of their keys. Note this means `"10"`
/// sorts before `"9"`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedStore {
    tables: BTreeMap<String, BTreeMap<String, Record>>,
}

impl NormalizedStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all types.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type names in ascending order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Number of records of one type.
    pub fn count(&self, type_name: &str) -> usize {
        self.tables.get(type_name).map_or(0, BTreeMap::len)
    }

    /// Insert a record under `(type_name, id)`, replacing any previous one.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        id: impl Into<EntityId>,
        record: Record,
    ) -> Option<Record> {
        let id = id.into();
        self.tables
            .entry(type_name.into())
            .or_default()
            .insert(id.as_key().into_owned(), record)
    }

    /// Declare a type with no records yet.
    pub fn insert_type(&mut self, type_name: impl Into<String>) {
        self.tables.entry(type_name.into()).or_default();
    }

    // ---------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------

    /// Build a store from a JSON document shaped
    /// `{ "<type>": { "<id>": <record>, .. }, .. }`.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let Value::Object(types) = value else {
            return Err(StoreError::NotAnObject("store document".into()));
        };

        let mut store = Self::new();
        for (type_name, table) in types {
            let Value::Object(records) = table else {
                return Err(StoreError::NotAnObject(format!("type table '{type_name}'")));
            };
            let mut parsed = BTreeMap::new();
            for (id, raw) in records {
                let record: Record =
                    serde_json::from_value(raw).map_err(|e| StoreError::MalformedRecord {
                        type_name: type_name.clone(),
                        id: id.clone(),
                        reason: e.to_string(),
                    })?;
                parsed.insert(id, record);
            }
            debug!(type_name = %type_name, records = parsed.len(), "loaded type table");
            store.tables.insert(type_name, parsed);
        }
        Ok(store)
    }

    /// Parse a store from a JSON string.
    pub fn from_json_str(json: &str) -> StoreResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Read and parse a store from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}

impl RecordSource for NormalizedStore {
    fn contains_type(&self, type_name: &str) -> bool {
        self.tables.contains_key(type_name)
    }

    fn record(&self, type_name: &str, id: &str) -> Option<&Record> {
        self.tables.get(type_name)?.get(id)
    }

    fn ids(&self, type_name: &str) -> Vec<EntityId> {
        self.tables
            .get(type_name)
            .map(|table| table.keys().map(|k| EntityId::Text(k.clone())).collect())
            .unwrap_or_default()
    }
}
