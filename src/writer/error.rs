/// Errors that can occur while writing output files
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from serde_json while serializing the document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The finished temporary file could not be moved into place
    #[error("Failed to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),

    /// The output directory does not exist or is not a directory
    #[error("Output directory not found: {0}")]
    MissingDirectory(String),
}
