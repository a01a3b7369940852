//! # Extraction
//!
//! Turns a parsed mzML document into an [`MsDocument`].
//!
//! A document is extracted either from its spectra or, when its spectrum list
//! is empty or absent, from its stored chromatograms:
//!
//! ```text
//! spectrumList ──► build_spectrum ──► target / range filter ──► classification ──► spectra
//!                                          │                          │
//!                                          └──── SIC points           └──── TIC / BPC points
//!
//! chromatogramList ──► build_chromatogram ──► chromatograms (unfiltered)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use exfilms::extraction::{ExtractionConfig, Extractor};
//! use exfilms::vocabulary::Precision;
//!
//! let config = ExtractionConfig {
//!     precision: Precision::Decimals(4),
//!     ..Default::default()
//! };
//! let document = Extractor::new(config).extract_file("sample.mzML")?;
//! println!("{} spectra", document.spectrum_count());
//! ```

mod arrays;
pub mod chromatogram;
mod config;
mod error;
pub mod filter;
mod models;
pub mod spectrum;

pub use chromatogram::{ChromatogramSet, BPC_ID, TIC_ID};
pub use config::{
    ArrayFilter, ExtractionConfig, MsLevelSelection, MzRange, Polarity, SpectrumFilter,
    SpectrumType, TargetFilter, DEFAULT_MZ_TOLERANCE, DEFAULT_PPM_TOLERANCE,
};
pub use error::ExtractionError;
pub use filter::{apply_range_filter, apply_target_filter, TargetHit};
pub use models::{
    BasePeak, BinaryArrayParams, Chromatogram, ChromatogramArray, Collision, Instrument,
    IsolationWindow, MsDocument, Precursor, Product, Scan, ScanWindow, Spectrum, SpectrumArray,
};

use std::path::Path;

use log::info;

use crate::mzml::{CvParam, MzMLDocument, MzMLError, MzMLNode};
use crate::vocabulary::map_params;

/// Extracts documents with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Parse and extract an mzML file
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<MsDocument, ExtractionError> {
        let document = MzMLDocument::open(path)?;
        self.extract(&document)
    }

    /// Extract a parsed document
    pub fn extract(&self, document: &MzMLDocument) -> Result<MsDocument, ExtractionError> {
        let mzml = document.mzml()?;
        let run = document.run()?;

        let id = mzml
            .attr("id")
            .or_else(|| run.attr("id"))
            .or_else(|| document.source_name())
            .ok_or_else(|| MzMLError::structure("document has no identifier"))?;
        let timestamp = run.attr("startTimeStamp").map(str::to_string);

        let mut output = MsDocument::new(id, timestamp);
        self.map_instrument(mzml, &mut output);

        let spectrum_list = run
            .child("spectrumList")
            .filter(|list| list.children_named("spectrum").next().is_some());

        if let Some(spectrum_list) = spectrum_list {
            let extracted = spectrum::extract_spectra(spectrum_list, &self.config)?;
            output.spectrum = extracted.spectra;
            output.chromatogram = extracted.chromatograms.into_vec();
        } else if let Some(chromatogram_list) = run.child("chromatogramList") {
            output.chromatogram =
                chromatogram::extract_chromatograms(chromatogram_list, self.config.precision)?;
        }

        info!(
            "Extracted {}: {} spectra, {} chromatograms",
            output.id,
            output.spectrum_count(),
            output.chromatogram_count()
        );
        Ok(output)
    }

    /// Instrument vendor and serial number from the document header
    fn map_instrument(&self, mzml: &MzMLNode, output: &mut MsDocument) {
        let precision = self.config.precision;

        let software = CvParam::collect(mzml.child("softwareList"), "software");
        map_params(&software, output, precision);

        let processing = CvParam::collect(mzml.child("dataProcessingList"), "dataProcessing");
        map_params(&processing, output, precision);

        if let Some(configurations) = mzml.child("instrumentConfigurationList") {
            for configuration in configurations.children_named("instrumentConfiguration") {
                map_params(&CvParam::collect(Some(configuration), "cvParam"), output, precision);
                map_params(&CvParam::collect(Some(configuration), "userParam"), output, precision);
            }
        }
    }
}
