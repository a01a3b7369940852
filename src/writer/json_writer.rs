use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use tempfile::NamedTempFile;

use super::error::WriterError;
use super::formatter::TabbedFormatter;
use super::stats::WriterStats;
use crate::extraction::MsDocument;

/// Default buffer size for output files
pub const DEFAULT_OUTPUT_BUFFER_SIZE: usize = 1024 * 1024;

/// Streams documents as JSON into any [`Write`] implementation
///
/// The document is serialized field by field straight into the buffered
/// sink; no intermediate string of the whole document is built.
pub struct JsonWriter<W: Write> {
    inner: BufWriter<W>,
    stats: WriterStats,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::with_capacity(DEFAULT_OUTPUT_BUFFER_SIZE, inner),
            stats: WriterStats::default(),
        }
    }

    /// Serialize one document, followed by a newline
    pub fn write_document(&mut self, document: &MsDocument) -> Result<(), WriterError> {
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut self.inner, TabbedFormatter::new());
        document.serialize(&mut serializer)?;
        self.inner.write_all(b"\n")?;

        let written = WriterStats::for_document(document);
        self.stats.spectra_written += written.spectra_written;
        self.stats.chromatograms_written += written.chromatograms_written;
        self.stats.points_written += written.points_written;
        Ok(())
    }

    pub fn stats(&self) -> WriterStats {
        self.stats.clone()
    }

    /// Flush buffered output and return the underlying writer
    pub fn finish(self) -> Result<W, WriterError> {
        self.inner
            .into_inner()
            .map_err(|e| WriterError::IoError(e.into_error()))
    }
}

/// Writes one `<id>.json` file per document into an output directory
///
/// Each file is first written to a temporary file in the same directory and
/// only moved into place once serialization succeeded, so a failed document
/// never leaves partial output behind.
#[derive(Debug, Clone)]
pub struct MsDocumentWriter {
    output_dir: PathBuf,
}

impl MsDocumentWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self, WriterError> {
        let output_dir = output_dir.as_ref();
        if !output_dir.is_dir() {
            return Err(WriterError::MissingDirectory(output_dir.display().to_string()));
        }
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination of the document with the given id
    ///
    /// Path separators in the id are replaced so the file always lands
    /// directly in the output directory.
    pub fn output_path(&self, id: &str) -> PathBuf {
        let name: String = id
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{name}.json"))
    }

    /// Write `document` and return where it was stored
    pub fn write(&self, document: &MsDocument) -> Result<(PathBuf, WriterStats), WriterError> {
        let path = self.output_path(&document.id);
        let temp = NamedTempFile::new_in(&self.output_dir)?;
        debug!("Writing {} via {}", path.display(), temp.path().display());

        let mut writer = JsonWriter::new(temp);
        writer.write_document(document)?;
        let mut stats = writer.stats();
        let temp = writer.finish()?;

        temp.persist(&path)?;
        stats.file_size_bytes = fs::metadata(&path)?.len();

        info!("{}: {}", path.display(), stats);
        Ok((path, stats))
    }
}
