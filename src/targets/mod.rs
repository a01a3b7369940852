//! # Target Lists
//!
//! Reads the tab-separated target files used for nearest-match filtering.
//! A target file is either a local `.tsv` path or an HTTP(S) URL (for
//! example a spreadsheet published with `output=tsv`).
//!
//! ## Layout
//!
//! The first row holds the column headers; all of [`REQUIRED_HEADERS`] must
//! be present. Only `Polarity` (`+`/`-`), `Mass-to-Charge Ratio (m/z)` and
//! `MS Level` are read, the remaining columns are carried for the benefit of
//! people editing the file.

mod error;

pub use error::TargetFileError;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};

use log::{info, warn};

use crate::extraction::{MsLevelSelection, Polarity};
use crate::vocabulary::Precision;

/// Columns every target file must declare
pub const REQUIRED_HEADERS: [&str; 8] = [
    "Compound Type",
    "Compound Name",
    "Polarity",
    "Mass-to-Charge Ratio (m/z)",
    "Retention Time (min)",
    "MS Level",
    "Internal Standards",
    "Products",
];

const POLARITY_COLUMN: &str = "Polarity";
const MZ_COLUMN: &str = "Mass-to-Charge Ratio (m/z)";
const MS_LEVEL_COLUMN: &str = "MS Level";

/// A single analyte target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetEntry {
    pub mz: f64,
    pub ms_level: i64,
    pub polarity: Polarity,
}

impl TargetEntry {
    pub fn new(mz: f64, ms_level: i64, polarity: Polarity) -> Self {
        Self {
            mz,
            ms_level,
            polarity,
        }
    }

    /// Whether a spectrum with this level and polarity is eligible
    pub fn applies_to(&self, ms_level: Option<i64>, polarity: Option<Polarity>) -> bool {
        ms_level == Some(self.ms_level) && polarity == Some(self.polarity)
    }

    /// Identifier of the selected ion chromatogram tracking this target
    pub fn chromatogram_id(&self) -> String {
        format!("SIC {}", self.mz)
    }
}

impl fmt::Display for TargetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.mz, self.ms_level, self.polarity.sign())
    }
}

/// Deduplicated targets in ascending m/z order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetList {
    entries: Vec<TargetEntry>,
}

impl TargetList {
    /// Sort by m/z and drop repeated entries
    ///
    /// Entries sharing an m/z keep their input order.
    pub fn new(mut entries: Vec<TargetEntry>) -> Self {
        entries.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        let mut seen = HashSet::new();
        entries.retain(|e| seen.insert((e.mz.to_bits(), e.ms_level, e.polarity)));
        Self { entries }
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TargetEntry> {
        self.entries.iter()
    }

    /// Targets eligible for a spectrum, in ascending m/z order
    pub fn matching(
        &self,
        ms_level: Option<i64>,
        polarity: Option<Polarity>,
    ) -> impl Iterator<Item = &TargetEntry> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.applies_to(ms_level, polarity))
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a TargetEntry;
    type IntoIter = std::slice::Iter<'a, TargetEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Which rows of a target file to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetQuery {
    pub ms_levels: MsLevelSelection,
    pub polarities: BTreeSet<Polarity>,
    /// Rounding applied to target m/z values
    pub precision: Precision,
}

impl Default for TargetQuery {
    fn default() -> Self {
        Self {
            ms_levels: MsLevelSelection::Any,
            polarities: [Polarity::Positive, Polarity::Negative].into(),
            precision: Precision::Full,
        }
    }
}

/// Whether `location` names a remote target file
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Read a target file from a local `.tsv` path or an HTTP(S) URL
pub fn read_target_file(location: &str, query: &TargetQuery) -> Result<TargetList, TargetFileError> {
    let list = if is_remote(location) {
        parse_targets(fetch_remote(location)?.as_bytes(), query)?
    } else if location.to_ascii_lowercase().ends_with(".tsv") {
        let file = File::open(location)?;
        parse_targets(BufReader::new(file), query)?
    } else {
        return Err(TargetFileError::InvalidLocation(location.to_string()));
    };

    info!("Read {} targets from {}", list.len(), location);
    Ok(list)
}

#[cfg(feature = "remote-targets")]
fn fetch_remote(url: &str) -> Result<String, TargetFileError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.text()?)
}

#[cfg(not(feature = "remote-targets"))]
fn fetch_remote(url: &str) -> Result<String, TargetFileError> {
    Err(TargetFileError::RemoteUnsupported(url.to_string()))
}

/// Parse tab-separated target rows
pub fn parse_targets<R: Read>(reader: R, query: &TargetQuery) -> Result<TargetList, TargetFileError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;
    if records.is_empty() {
        return Err(TargetFileError::Empty);
    }

    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|h| h.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TargetFileError::MissingHeaders(missing));
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    // Presence was checked above
    let (Some(polarity_col), Some(mz_col), Some(level_col)) =
        (column(POLARITY_COLUMN), column(MZ_COLUMN), column(MS_LEVEL_COLUMN))
    else {
        return Err(TargetFileError::MissingHeaders(Vec::new()));
    };

    let mut entries = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let Some(polarity) = Polarity::from_sign(cell(polarity_col)) else {
            continue;
        };
        if !query.polarities.contains(&polarity) {
            continue;
        }

        let Ok(ms_level) = cell(level_col).parse::<i64>() else {
            warn!("Skipping target row {}: invalid MS level {:?}", row + 2, cell(level_col));
            continue;
        };
        if !query.ms_levels.accepts(Some(ms_level)) {
            continue;
        }

        let mz = match cell(mz_col).parse::<f64>() {
            Ok(mz) if mz.is_finite() => mz,
            _ => {
                warn!("Skipping target row {}: invalid m/z {:?}", row + 2, cell(mz_col));
                continue;
            }
        };

        entries.push(TargetEntry::new(query.precision.apply(mz), ms_level, polarity));
    }

    let list = TargetList::new(entries);
    if list.is_empty() {
        return Err(TargetFileError::EmptyTargetList);
    }
    Ok(list)
}
