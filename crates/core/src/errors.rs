use thiserror::Error;

/// Unified error type for the entire finance-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    // ── Snapshot encoding ───────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),

    // ── Storage backend ─────────────────────────────────────────────
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    StorageFull { needed: usize, available: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Shorthand used by the store for unknown-id lookups.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// `true` for errors raised by the persistence layer, as opposed to
    /// input validation or lookups.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            CoreError::Serialization(_)
                | CoreError::StorageFull { .. }
                | CoreError::Storage(_)
                | CoreError::FileIO(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
