//! Conversion of vendor formats into mzML
//!
//! Conversion is delegated to an external program; [`CommandConverter`] runs
//! any `msconvert`-compatible executable.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use super::error::BatchError;

/// Converts a data file into one or more mzML files
pub trait FormatConverter {
    /// Convert `input` into mzML files written under `work_dir`, returning their paths
    fn convert(&self, input: &Path, work_dir: &Path) -> Result<Vec<PathBuf>, BatchError>;
}

/// Runs an external converter as `<program> <args...> <input> -o <work_dir>`
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandConverter {
    /// Arguments passed to `msconvert` when none are configured
    pub const MSCONVERT_ARGS: [&'static str; 3] = ["--mzML", "--zlib", "--64"];

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Self::MSCONVERT_ARGS.iter().map(OsString::from).collect(),
        }
    }

    /// Replace the arguments placed before the input path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl FormatConverter for CommandConverter {
    fn convert(&self, input: &Path, work_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
        info!("Converting {} with {}", input.display(), self.program.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .arg("-o")
            .arg(work_dir)
            .output()?;

        if !output.status.success() {
            return Err(BatchError::ConversionFailed {
                file: input.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let converted = mzml_files(work_dir)?;
        debug!("{} produced {} mzML files", input.display(), converted.len());
        Ok(converted)
    }
}

/// mzML files directly inside `dir`, sorted by name
pub fn mzml_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && super::is_mzml(path))
        .collect();
    files.sort();
    Ok(files)
}
