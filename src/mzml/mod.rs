//! # mzML Input Module
//!
//! This module reads mzML files, the XML-based community standard for mass
//! spectrometry data defined by HUPO-PSI, into an attribute/child tree and
//! decodes the base64 binary arrays embedded in it.
//!
//! ## mzML Structure
//!
//! ```text
//! indexedmzML (optional wrapper)
//! └── mzML
//!     ├── softwareList
//!     ├── instrumentConfigurationList
//!     ├── dataProcessingList
//!     └── run
//!         ├── spectrumList
//!         │   └── spectrum* (many)
//!         │       ├── cvParam*
//!         │       ├── scanList
//!         │       ├── precursorList (for MS2+)
//!         │       └── binaryDataArrayList
//!         │           └── binaryDataArray*
//!         │               ├── cvParam* (encoding info)
//!         │               └── binary (base64 data)
//!         └── chromatogramList (optional)
//! ```

mod binary;
mod cv_params;
mod error;
mod tree;

pub use binary::{
    ArrayRole, BinaryArrayConfig, BinaryDecodeError, BinaryDecoder, BinaryEncoding,
    CompressionType,
};
pub use cv_params::CvParam;
pub use error::MzMLError;
pub use tree::{MzMLDocument, MzMLNode, DEFAULT_INPUT_BUFFER_SIZE};
