/// Errors that can occur while reading a target file
#[derive(Debug, thiserror::Error)]
pub enum TargetFileError {
    /// I/O error reading a local target file
    #[error("Failed to read target file: {0}")]
    IoError(#[from] std::io::Error),

    /// TSV parsing error
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Remote target file could not be fetched
    #[cfg(feature = "remote-targets")]
    #[error("Failed to fetch remote target file: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Remote location given but HTTP support is not compiled in
    #[error("Remote target files are not supported in this build: {0}")]
    RemoteUnsupported(String),

    /// Location is neither a `.tsv` path nor an HTTP(S) URL
    #[error("Target file location does not match a TSV path or URL: {0}")]
    InvalidLocation(String),

    /// The file has no data rows
    #[error("Target file is empty")]
    Empty,

    /// Required columns are absent
    #[error("Missing data headers ({})", .0.join(", "))]
    MissingHeaders(Vec<String>),

    /// No row matched the requested ms levels and polarities
    #[error("Target list is empty")]
    EmptyTargetList,
}
