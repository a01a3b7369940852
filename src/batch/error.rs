use std::path::PathBuf;

use crate::extraction::ExtractionError;
use crate::writer::WriterError;

/// Errors that fail a single file of a batch
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// I/O error while preparing, converting or logging
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document could not be extracted
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The extracted document could not be written
    #[error(transparent)]
    Writer(#[from] WriterError),

    /// A non-mzML file was given but no converter is configured
    #[error("No converter available for {}", .0.display())]
    NoConverter(PathBuf),

    /// The external converter exited unsuccessfully
    #[error("Conversion of {} failed: {message}", .file.display())]
    ConversionFailed { file: PathBuf, message: String },

    /// The converter finished but produced no mzML file
    #[error("No data files available for extraction")]
    NoConvertedFiles,
}

/// A file that failed, with the reason
#[derive(Debug)]
pub struct FileError {
    pub file: PathBuf,
    pub error: BatchError,
}
