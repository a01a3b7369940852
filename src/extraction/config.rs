//! Extraction settings
//!
//! The CLI (or any other front-end) validates user input into these types;
//! the extractors consume them as-is.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::error::ExtractionError;
use super::models::Spectrum;
use crate::targets::TargetList;
use crate::vocabulary::Precision;

/// Default absolute m/z tolerance of the target filter
pub const DEFAULT_MZ_TOLERANCE: f64 = 0.005;

/// Default relative tolerance of the target filter, in ppm
pub const DEFAULT_PPM_TOLERANCE: f64 = 5.0;

/// Settings for extracting one document
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Rounding of measurements and decoded arrays
    pub precision: Precision,

    /// Drop the m/z and intensity arrays after filtering
    pub metadata_only: bool,

    /// Keep only spectra matching these classes
    pub spectrum_filter: Option<SpectrumFilter>,

    /// Reduce each spectrum's arrays to targets or an m/z range
    pub array_filter: ArrayFilter,
}

impl ExtractionConfig {
    /// Target list, when target filtering is configured
    pub fn targets(&self) -> Option<&TargetList> {
        match &self.array_filter {
            ArrayFilter::Target(filter) => Some(&filter.targets),
            _ => None,
        }
    }

    /// Whether `spectrum` passes the classification filter (always true without one)
    pub fn accepts(&self, spectrum: &Spectrum) -> bool {
        self.spectrum_filter
            .as_ref()
            .map_or(true, |filter| filter.accepts(spectrum))
    }

    /// Whether `spectrum` adds points to the selected ion chromatograms
    ///
    /// Without a classification filter only centroid and profile spectra do.
    pub fn feeds_selected_ions(&self, spectrum: &Spectrum) -> bool {
        match &self.spectrum_filter {
            Some(filter) => filter.accepts(spectrum),
            None => classified_type(spectrum).is_some(),
        }
    }
}

fn classified_type(spectrum: &Spectrum) -> Option<SpectrumType> {
    spectrum
        .spectrum_type
        .as_deref()
        .and_then(|t| t.parse::<SpectrumType>().ok())
}

/// Array reduction applied to every spectrum
///
/// Target and range filtering are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub enum ArrayFilter {
    #[default]
    None,
    Target(TargetFilter),
    Range(MzRange),
}

impl ArrayFilter {
    /// Combine optional target and range settings
    ///
    /// Requesting both is a configuration error.
    pub fn resolve(
        target: Option<TargetFilter>,
        range: Option<MzRange>,
    ) -> Result<Self, ExtractionError> {
        match (target, range) {
            (Some(_), Some(_)) => Err(ExtractionError::filter_config(
                "target filtering and m/z range filtering are mutually exclusive",
            )),
            (Some(target), None) => Ok(ArrayFilter::Target(target)),
            (None, Some(range)) => Ok(ArrayFilter::Range(range)),
            (None, None) => Ok(ArrayFilter::None),
        }
    }
}

/// Nearest-match filtering against a target list
#[derive(Debug, Clone)]
pub struct TargetFilter {
    pub targets: TargetList,
    /// Absolute tolerance in m/z
    pub mz_tolerance: f64,
    /// Relative tolerance in ppm
    pub ppm_tolerance: f64,
}

impl TargetFilter {
    pub fn new(targets: TargetList) -> Self {
        Self {
            targets,
            mz_tolerance: DEFAULT_MZ_TOLERANCE,
            ppm_tolerance: DEFAULT_PPM_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, mz_tolerance: f64, ppm_tolerance: f64) -> Self {
        self.mz_tolerance = mz_tolerance;
        self.ppm_tolerance = ppm_tolerance;
        self
    }

    /// Half-width of the acceptance window around `target_mz`
    pub fn tolerance_for(&self, target_mz: f64) -> f64 {
        (self.ppm_tolerance / 1e6 * target_mz)
            .abs()
            .max(self.mz_tolerance)
    }
}

/// Inclusive m/z interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MzRange {
    min: f64,
    max: Option<f64>,
}

impl MzRange {
    /// Create a range; `max = None` leaves the upper end open
    pub fn new(min: f64, max: Option<f64>) -> Result<Self, ExtractionError> {
        if !min.is_finite() || min < 0.0 {
            return Err(ExtractionError::filter_config(format!(
                "minimum m/z must be a number >= 0, got {min}"
            )));
        }
        if let Some(max) = max {
            if !max.is_finite() || max <= min {
                return Err(ExtractionError::filter_config(format!(
                    "maximum m/z must be greater than {min}, got {max}"
                )));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

impl Default for MzRange {
    fn default() -> Self {
        Self { min: 0.0, max: None }
    }
}

/// Spectrum classification filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumFilter {
    pub ms_levels: MsLevelSelection,
    pub spectrum_types: BTreeSet<SpectrumType>,
    pub polarities: BTreeSet<Polarity>,
}

impl Default for SpectrumFilter {
    /// Accepts every level, type and polarity
    fn default() -> Self {
        Self {
            ms_levels: MsLevelSelection::Any,
            spectrum_types: [SpectrumType::Profile, SpectrumType::Centroid].into(),
            polarities: [Polarity::Positive, Polarity::Negative].into(),
        }
    }
}

impl SpectrumFilter {
    /// A spectrum passes when its level, type and polarity are all accepted
    ///
    /// A spectrum with no type or polarity never passes.
    pub fn accepts(&self, spectrum: &Spectrum) -> bool {
        self.ms_levels.accepts(spectrum.ms_level)
            && classified_type(spectrum).is_some_and(|t| self.spectrum_types.contains(&t))
            && spectrum
                .polarity
                .as_deref()
                .and_then(|p| p.parse::<Polarity>().ok())
                .is_some_and(|p| self.polarities.contains(&p))
    }
}

/// Accepted MS levels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MsLevelSelection {
    /// Every level, including spectra without one
    #[default]
    Any,
    /// Only these levels; an empty set accepts nothing
    Only(BTreeSet<i64>),
}

impl MsLevelSelection {
    pub fn accepts(&self, level: Option<i64>) -> bool {
        match self {
            MsLevelSelection::Any => true,
            MsLevelSelection::Only(levels) => level.is_some_and(|l| levels.contains(&l)),
        }
    }
}

impl FromIterator<i64> for MsLevelSelection {
    fn from_iter<I: IntoIterator<Item = i64>>(levels: I) -> Self {
        MsLevelSelection::Only(levels.into_iter().collect())
    }
}

/// Spectrum representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpectrumType {
    Profile,
    Centroid,
}

impl SpectrumType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpectrumType::Profile => "profile",
            SpectrumType::Centroid => "centroid",
        }
    }
}

impl FromStr for SpectrumType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "profile" => Ok(SpectrumType::Profile),
            "centroid" => Ok(SpectrumType::Centroid),
            other => Err(format!("unknown spectrum type '{other}'")),
        }
    }
}

impl fmt::Display for SpectrumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }

    /// Sign used in target files
    pub fn sign(&self) -> char {
        match self {
            Polarity::Positive => '+',
            Polarity::Negative => '-',
        }
    }

    pub fn from_sign(sign: &str) -> Option<Self> {
        match sign.trim() {
            "+" => Some(Polarity::Positive),
            "-" => Some(Polarity::Negative),
            _ => None,
        }
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Polarity::Positive),
            "negative" => Ok(Polarity::Negative),
            other => Err(format!("unknown polarity '{other}'")),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
