use thiserror::Error;

/// Failures the assessment engine reports to its callers.
///
/// Lookups that legitimately find nothing (a subject missing from the catalog, a record that
/// was never saved) are returned as `Option` values and never show up here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected before anything was written.
    #[error("{0}")]
    Validation(String),

    #[error("record store query failed: {0}")]
    Store(#[from] rusqlite::Error),

    /// Stored JSON that no longer parses. Nothing can recover from this at request level.
    #[error("stored {collection} data is corrupt: {source}")]
    Corrupt {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {collection}: {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Error code used on the IPC wire.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "bad_params",
            EngineError::Store(_) => "db_query_failed",
            EngineError::Corrupt { .. } => "corrupt_store",
            EngineError::Encode { .. } => "db_update_failed",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
