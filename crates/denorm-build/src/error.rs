use crate::object::ObjectHandle;

/// Errors from building or reading denormalized objects.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A relationship offers only a remote link and no embedded data.
    #[error(
        "relationship '{relationship}' of {type_name}/{id} is link-only; remote loading is not \
         supported (set ignore_links to treat it as omitted)"
    )]
    UnresolvedRemoteLink {
        type_name: String,
        id: String,
        relationship: String,
    },

    /// The handle does not belong to this cache.
    #[error("unknown object handle: {0}")]
    UnknownObject(ObjectHandle),

    /// The object has no relationship with this name.
    #[error("{type_name}/{id} has no relationship '{relationship}'")]
    UnknownRelationship {
        type_name: String,
        id: String,
        relationship: String,
    },

    /// An options document could not be parsed.
    #[error("invalid build options: {0}")]
    Config(String),
}

/// Convenience alias for build results.
pub type BuildResult<T> = Result<T, BuildError>;
