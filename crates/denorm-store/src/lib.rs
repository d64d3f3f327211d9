//! Read-only access to a normalized record store.
//!
//! The store maps a type name to a table of records keyed by the string
//! form of their id. Builders only ever read from it; populating and
//! maintaining the store is the caller's business.
//!
//! # Backends
//!
//! All backends implement the [`RecordSource`] trait:
//!
//! - [`NormalizedStore`] -- `BTreeMap`-based store, loadable from JSON
//!
//! # Design Rules
//!
//! 1. Lookups have no side effects.
//! 2. Id enumeration order is stable: ascending by id key.
//! 3. Records are validated only as far as deserialization requires;
//!    a record without `attributes` is rejected at load time.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::NormalizedStore;
pub use traits::RecordSource;
