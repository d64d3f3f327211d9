//! Denormalization of normalized record stores.
//!
//! Rebuilds nested object graphs from a store of flat per-type records whose
//! relationships are `(type, id)` pointers. Each entity is built at most once
//! per [`IdentityCache`], so shared and cyclic relationships point at the
//! same object instead of copies.
//!
//! # Key Types
//!
//! - [`build`] -- the entry point, building one id, a list, or a whole type
//! - [`BuildOptions`] -- eager vs. deferred resolution, link handling,
//!   circular-reference suppression, `type`/`meta` attachment
//! - [`IdentityCache`] -- owns built objects, one per `(type, id)`
//! - [`BuiltObject`] -- a projected entity with its relationships
//! - [`RelationshipValue`] -- what a relationship resolved to
//! - [`Denormalizer`] -- a store, options, and cache bundled for repeated use
//!
//! # Resolution Modes
//!
//! With `eager` set, every relationship reachable from the requested objects
//! is resolved before [`build`] returns. Otherwise relationships stay pending
//! until first read through [`IdentityCache::relationship`]; the result is
//! stored on the object and later reads return it unchanged.
//!
//! # Cycles
//!
//! An object is cached before its relationships resolve, so a path that
//! returns to the same `(type, id)` ends at the existing object. With
//! `allow_circular` off, a target whose type already appears on the current
//! path is left as a raw [`EntityRef`](denorm_types::EntityRef).

pub mod builder;
pub mod cache;
pub mod error;
mod meta;
pub mod object;
pub mod options;
pub mod render;
mod resolver;
pub mod session;

pub use builder::build;
pub use cache::{CacheKey, CacheStats, IdentityCache};
pub use error::{BuildError, BuildResult};
pub use object::{Built, BuiltObject, ObjectHandle, RelationshipValue, Resolution};
pub use options::BuildOptions;
pub use render::{built_to_json, object_to_json};
pub use session::Denormalizer;
