use std::fmt;

use crate::extraction::MsDocument;

/// Statistics from a completed write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of spectra written to the file
    pub spectra_written: usize,
    /// Number of chromatograms written to the file
    pub chromatograms_written: usize,
    /// Array points across all spectra and chromatograms
    pub points_written: usize,
    /// Total file size in bytes
    pub file_size_bytes: u64,
}

impl WriterStats {
    pub(crate) fn for_document(document: &MsDocument) -> Self {
        let spectrum_points: usize = document.spectrum.iter().map(|s| s.array.len()).sum();
        let chromatogram_points: usize = document.chromatogram.iter().map(|c| c.array.len()).sum();
        Self {
            spectra_written: document.spectrum_count(),
            chromatograms_written: document.chromatogram_count(),
            points_written: spectrum_points + chromatogram_points,
            file_size_bytes: 0,
        }
    }
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} spectra and {} chromatograms ({} points, {} bytes)",
            self.spectra_written, self.chromatograms_written, self.points_written, self.file_size_bytes
        )
    }
}
