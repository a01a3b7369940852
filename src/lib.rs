//! # exfilms - Extract Mass Spectrometry Data into JSON
//!
//! `exfilms` reads mzML documents, normalizes their controlled-vocabulary
//! metadata into one uniform record layout and writes each document as a
//! single JSON file. Spectra can be reduced to a list of analyte targets or to
//! an m/z range along the way.
//!
//! ## Key Features
//!
//! - **Vocabulary Normalization**: PSI-MS terms (and the vendor identifiers of
//!   ProteoWizard readers) are mapped onto typed record fields through one
//!   static table.
//!
//! - **Binary Array Decoding**: base64 arrays, zlib compressed or not, in
//!   32-bit or 64-bit little-endian floats.
//!
//! - **Target Filtering**: nearest-match search within a ppm / absolute m/z
//!   tolerance window, with one selected ion chromatogram per target.
//!
//! - **Range Filtering**: inclusive m/z interval with recomputed total ion
//!   current and base peak.
//!
//! - **Aggregate Chromatograms**: TIC and BPC built from the retained spectra.
//!
//! - **Streaming Output**: documents are serialized straight into the output
//!   file, which is only moved into place once complete.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exfilms::extraction::{ExtractionConfig, Extractor, MzRange, ArrayFilter};
//! use exfilms::vocabulary::Precision;
//! use exfilms::writer::MsDocumentWriter;
//!
//! let config = ExtractionConfig {
//!     precision: Precision::Decimals(4),
//!     array_filter: ArrayFilter::Range(MzRange::new(100.0, Some(1000.0))?),
//!     ..Default::default()
//! };
//!
//! let document = Extractor::new(config).extract_file("sample.mzML")?;
//! let (path, stats) = MsDocumentWriter::new("out")?.write(&document)?;
//! println!("{}: {}", path.display(), stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`mzml`]: mzML tree builder and binary array decoder
//! - [`vocabulary`]: controlled vocabulary tables and the field mapper
//! - [`extraction`]: spectrum and chromatogram records, filters, extractor
//! - [`targets`]: target list reader (local TSV or HTTP(S))
//! - [`writer`]: streaming JSON writer
//! - [`batch`]: sequential multi-file runner with external converter support

// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod batch;
pub mod extraction;
pub mod mzml;
pub mod targets;
pub mod vocabulary;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{BatchReport, BatchRunner, CommandConverter, FormatConverter};
    pub use crate::extraction::{
        ArrayFilter, Chromatogram, ExtractionConfig, ExtractionError, Extractor, MsDocument,
        MsLevelSelection, MzRange, Polarity, Spectrum, SpectrumFilter, SpectrumType,
        TargetFilter,
    };
    pub use crate::mzml::{MzMLDocument, MzMLError};
    pub use crate::targets::{read_target_file, TargetEntry, TargetList, TargetQuery};
    pub use crate::vocabulary::Precision;
    pub use crate::writer::{MsDocumentWriter, WriterError, WriterStats};
}
