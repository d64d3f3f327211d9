use denorm_types::{EntityId, Record};

/// Read-only lookup of records by type and id.
///
/// Implementations must satisfy these invariants:
/// - Lookups never mutate the store.
/// - [`ids`](RecordSource::ids) returns the same order on every call for an
///   unchanged store.
/// - An unknown type or id is a normal absent value, never an error.
pub trait RecordSource {
    /// Whether the store has a table for `type_name` (possibly empty).
    fn contains_type(&self, type_name: &str) -> bool;

    /// Look up one record by the string form of its id.
    fn record(&self, type_name: &str, id: &str) -> Option<&Record>;

    /// All ids of a type, in the store's natural order.
    ///
    /// Returns an empty list for an unknown type.
    fn ids(&self, type_name: &str) -> Vec<EntityId>;
}
