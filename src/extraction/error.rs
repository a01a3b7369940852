use crate::mzml::MzMLError;

/// Errors that can occur while extracting a document
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The document could not be read or lacks required structure
    #[error("mzML error: {0}")]
    MzML(#[from] MzMLError),

    /// Inconsistent filter configuration, raised before extraction starts
    #[error("Invalid filter configuration: {0}")]
    FilterConfig(String),
}

impl ExtractionError {
    pub(crate) fn filter_config(message: impl Into<String>) -> Self {
        Self::FilterConfig(message.into())
    }
}
