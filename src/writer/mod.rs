//! # JSON Writer Module
//!
//! Writes extracted documents as JSON, one file per document.
//!
//! ## Output Layout
//!
//! ```text
//! {
//! 	"id": "sample",
//! 	"timestamp": "2024-03-01T08:30:00Z",
//! 	"instrument": { "vendor": ..., "serialNumber": ... },
//! 	"spectrumCount": 2,
//! 	"spectrum": [ { "index": 0, "id": ..., "array": { "length": 3, "mz": [...], "intensity": [...] } }, ... ],
//! 	"chromatogramCount": 2,
//! 	"chromatogram": [ { "index": 0, "id": "TIC", "array": { "length": 2, "time": [...], "intensity": [...], "msLevel": [...] } }, ... ]
//! }
//! ```
//!
//! Numeric arrays are kept on one line; everything else is tab-indented.

mod error;
mod formatter;
mod json_writer;
mod stats;


pub use error::WriterError;
pub use formatter::TabbedFormatter;
pub use json_writer::{JsonWriter, MsDocumentWriter, DEFAULT_OUTPUT_BUFFER_SIZE};
pub use stats::WriterStats;
