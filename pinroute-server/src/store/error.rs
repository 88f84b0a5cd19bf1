//! Pin store error types.

/// Errors from the pin store and its backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a key failed
    #[error("storage error for {key}: {message}")]
    Io { key: String, message: String },

    /// A value could not be encoded for storage
    #[error("failed to encode {key}: {message}")]
    Encode { key: String, message: String },

    /// Import data matched no known shape
    #[error("unrecognized import data: {0}")]
    UnrecognizedImport(String),

    /// Backup written by a newer version
    #[error("unsupported backup version {0}")]
    UnsupportedVersion(u32),

    /// No pin with this id
    #[error("pin not found: {0}")]
    PinNotFound(String),

    /// Remote mirror rejected a write
    #[error("mirror error: {0}")]
    Mirror(String),
}

impl StoreError {
    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::UnrecognizedImport(_)
                | StoreError::UnsupportedVersion(_)
                | StoreError::PinNotFound(_)
        )
    }
}
