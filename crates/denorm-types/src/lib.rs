//! Data model for normalized record stores.
//!
//! A normalized store keeps every entity exactly once, filed under its type
//! and id, and expresses relationships as typed pointers instead of embedded
//! copies. This crate defines the shapes the rest of the workspace reads:
//!
//! # Key Types
//!
//! - [`EntityId`] -- an entity identifier, textual or numeric
//! - [`EntityRef`] -- a `(type, id)` pointer to another entity
//! - [`RefData`] -- the embedded data of a relationship (absent, null, one, many)
//! - [`RelationshipSlot`] -- one named relationship of a record
//! - [`Record`] -- a stored entity: id, attributes, relationships, meta
//! - [`IdSelector`] -- which ids of a type a build request asks for

pub mod id;
pub mod record;
pub mod reference;

pub use id::{EntityId, IdSelector};
pub use record::{Record, RelationshipSlot};
pub use reference::{EntityRef, RefData};

/// A JSON object, used for attributes, meta blocks, and links.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
