/// Errors from loading a normalized store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document, or one of its type tables, is not a JSON object.
    #[error("expected a JSON object for {0}")]
    NotAnObject(String),

    /// A record failed to deserialize (typically missing `attributes`).
    #[error("malformed record {type_name}/{id}: {reason}")]
    MalformedRecord {
        type_name: String,
        id: String,
        reason: String,
    },

    /// The input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading a store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
