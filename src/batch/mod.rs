//! # Batch Processing
//!
//! Runs extraction over a list of files, one at a time and in order. A
//! failing file is recorded and skipped; it never stops the batch.
//!
//! Files that are not mzML are first handed to a [`FormatConverter`]. When a
//! conversion yields several mzML files (WIFF files holding several samples),
//! those are queued at the end of the batch instead of being extracted right
//! away.
//!
//! Every file gets a record in the optional append-only log file:
//!
//! ```text
//! 2024-03-01 08:30:00 +01:00	sample.mzML
//! 2024-03-01 08:30:02 +01:00	broken.mzML
//! mzML error: Invalid mzML structure: mzML without a run element
//!
//! Failed extraction: [broken.mzML]
//! ```

mod converter;
mod error;

#[cfg(test)]
mod tests;

pub use converter::{mzml_files, CommandConverter, FormatConverter};
pub use error::{BatchError, FileError};

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::TempDir;

use crate::extraction::Extractor;
use crate::writer::{MsDocumentWriter, WriterStats};

/// Extensions recognised by [`list_data_files`], compared case-insensitively
pub const DATA_FILE_EXTENSIONS: [&str; 4] = ["d", "raw", "wiff", "mzml"];

/// Whether `path` has an `.mzML` extension (any case)
pub fn is_mzml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mzml"))
}

/// Data files and directories in `dir`, sorted by name
///
/// AppleDouble resource forks (`._*`) are skipped.
pub fn list_data_files<P: AsRef<Path>>(dir: P) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with("._") {
            continue;
        }
        let known = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| DATA_FILE_EXTENSIONS.iter().any(|k| ext.eq_ignore_ascii_case(k)));
        if known {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// What happened to one entry of the batch
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was extracted and written
    Written { output: PathBuf, stats: WriterStats },
    /// The file was converted into several mzML files, queued for extraction
    Queued(usize),
    Failed(BatchError),
}

/// Progress notification passed to the per-file callback
#[derive(Debug)]
pub struct FileReport<'a> {
    /// 1-based position in the batch
    pub number: usize,
    pub file: &'a Path,
    pub outcome: &'a FileOutcome,
}

/// Summary of a finished batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files in processing order
    pub written: Vec<PathBuf>,
    pub failures: Vec<FileError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Display names of the failed files
    pub fn failed_files(&self) -> Vec<String> {
        self.failures.iter().map(|f| display_name(&f.file)).collect()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sequential extraction of a list of files
pub struct BatchRunner {
    extractor: Extractor,
    writer: MsDocumentWriter,
    converter: Option<Box<dyn FormatConverter>>,
    log_file: Option<PathBuf>,
}

impl BatchRunner {
    pub fn new(extractor: Extractor, writer: MsDocumentWriter) -> Self {
        Self {
            extractor,
            writer,
            converter: None,
            log_file: None,
        }
    }

    /// Converter used for files that are not mzML
    pub fn with_converter(mut self, converter: Box<dyn FormatConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Append a record per file to `path`
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Process `files` without progress notifications
    pub fn run(&self, files: Vec<PathBuf>) -> Result<BatchReport, BatchError> {
        self.run_with(files, |_| {})
    }

    /// Process `files` in order, calling `on_file` after each one
    ///
    /// Only failures to write the log file end the batch early.
    pub fn run_with<F>(&self, files: Vec<PathBuf>, mut on_file: F) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&FileReport<'_>),
    {
        let mut queue: VecDeque<PathBuf> = files.into();
        let mut report = BatchReport::default();
        // Converted files live until the batch ends
        let mut work_dirs: Vec<TempDir> = Vec::new();
        let mut number = 0;

        info!("File count: {}", queue.len());
        while let Some(file) = queue.pop_front() {
            number += 1;
            let mut record = format!(
                "{}\t{}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z"),
                display_name(&file)
            );

            let outcome = match self.process(&file, &mut work_dirs) {
                Ok(Processed::Written(output, stats)) => {
                    report.written.push(output.clone());
                    FileOutcome::Written { output, stats }
                }
                Ok(Processed::Converted(converted)) => {
                    let count = converted.len();
                    record.push_str(&format!(
                        "\n{count} additional data files queued for extraction\n"
                    ));
                    queue.extend(converted);
                    FileOutcome::Queued(count)
                }
                Err(error) => {
                    warn!("{}: {}", file.display(), error);
                    record.push_str(&format!("\n{error}\n"));
                    FileOutcome::Failed(error)
                }
            };

            on_file(&FileReport {
                number,
                file: &file,
                outcome: &outcome,
            });

            if let FileOutcome::Failed(error) = outcome {
                report.failures.push(FileError { file, error });
            }

            record.push('\n');
            self.append_log(&record)?;
        }

        let summary = format!("\nFailed extraction: [{}]\n", report.failed_files().join(","));
        self.append_log(&summary)?;
        info!("{}", summary.trim());

        Ok(report)
    }

    fn process(&self, file: &Path, work_dirs: &mut Vec<TempDir>) -> Result<Processed, BatchError> {
        let mzml = if is_mzml(file) {
            file.to_path_buf()
        } else {
            let converter = self
                .converter
                .as_ref()
                .ok_or_else(|| BatchError::NoConverter(file.to_path_buf()))?;
            let work_dir = TempDir::new()?;
            let mut converted = converter.convert(file, work_dir.path())?;
            work_dirs.push(work_dir);

            match converted.len() {
                0 => return Err(BatchError::NoConvertedFiles),
                1 => converted.remove(0),
                _ => return Ok(Processed::Converted(converted)),
            }
        };

        let document = self.extractor.extract_file(&mzml)?;
        let (output, stats) = self.writer.write(&document)?;
        Ok(Processed::Written(output, stats))
    }

    fn append_log(&self, text: &str) -> Result<(), BatchError> {
        if let Some(path) = &self.log_file {
            let mut log = OpenOptions::new().create(true).append(true).open(path)?;
            log.write_all(text.as_bytes())?;
        }
        Ok(())
    }
}

enum Processed {
    Written(PathBuf, WriterStats),
    Converted(Vec<PathBuf>),
}
