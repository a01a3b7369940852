//! Output records
//!
//! The serde layout of these types is the JSON layout of the output files:
//! camelCase keys in declaration order, nullable scalars as `null`. Array
//! lengths and record counts are derived from the sequences when serialized.

use log::warn;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::mzml::BinaryEncoding;
use crate::vocabulary::{Field, MapTarget, Slot};

/// One extracted document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsDocument {
    /// Document identifier, also the output file name
    pub id: String,
    /// Acquisition start timestamp
    pub timestamp: Option<String>,
    pub instrument: Instrument,
    pub spectrum: Vec<Spectrum>,
    pub chromatogram: Vec<Chromatogram>,
}

impl MsDocument {
    pub fn new(id: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            ..Default::default()
        }
    }

    pub fn spectrum_count(&self) -> usize {
        self.spectrum.len()
    }

    pub fn chromatogram_count(&self) -> usize {
        self.chromatogram.len()
    }
}

impl Serialize for MsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MsDocument", 7)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("instrument", &self.instrument)?;
        state.serialize_field("spectrumCount", &self.spectrum_count())?;
        state.serialize_field("spectrum", &self.spectrum)?;
        state.serialize_field("chromatogramCount", &self.chromatogram_count())?;
        state.serialize_field("chromatogram", &self.chromatogram)?;
        state.end()
    }
}

impl MapTarget for MsDocument {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        match field {
            Field::InstrumentVendor => Some(Slot::Text(&mut self.instrument.vendor)),
            Field::InstrumentSerialNumber => Some(Slot::Text(&mut self.instrument.serial_number)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub vendor: Option<String>,
    pub serial_number: Option<String>,
}

/// A single spectrum
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spectrum {
    /// Position among the retained spectra
    pub index: usize,
    pub id: String,
    pub ms_level: Option<i64>,
    /// `centroid` or `profile`
    #[serde(rename = "type")]
    pub spectrum_type: Option<String>,
    /// `positive` or `negative`
    pub polarity: Option<String>,
    pub scan: Scan,
    pub precursor: Precursor,
    pub collision: Collision,
    pub total_ion_current: Option<f64>,
    pub base_peak: BasePeak,
    pub array: SpectrumArray,
}

impl Spectrum {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            ..Default::default()
        }
    }
}

impl MapTarget for Spectrum {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        let slot = match field {
            Field::MsLevel => Slot::Integer(&mut self.ms_level),
            Field::Type => Slot::Text(&mut self.spectrum_type),
            Field::Polarity => Slot::Text(&mut self.polarity),
            Field::ScanType => Slot::Text(&mut self.scan.scan_type),
            Field::ScanTime => Slot::Number(&mut self.scan.time),
            Field::ScanInverseReducedIonMobility => {
                Slot::Number(&mut self.scan.inverse_reduced_ion_mobility)
            }
            Field::ScanWindowLowerLimit => Slot::Number(&mut self.scan.window.lower_limit),
            Field::ScanWindowUpperLimit => Slot::Number(&mut self.scan.window.upper_limit),
            Field::TotalIonCurrent => Slot::Number(&mut self.total_ion_current),
            Field::BasePeakMz => Slot::Number(&mut self.base_peak.mz),
            Field::BasePeakIntensity => Slot::Number(&mut self.base_peak.intensity),
            Field::PrecursorMz => Slot::Number(&mut self.precursor.mz),
            Field::PrecursorChargeState => Slot::Integer(&mut self.precursor.charge_state),
            Field::CollisionType => Slot::Text(&mut self.collision.collision_type),
            Field::CollisionEnergy => Slot::Number(&mut self.collision.energy),
            _ => return None,
        };
        Some(slot)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    #[serde(rename = "type")]
    pub scan_type: Option<String>,
    /// Scan start time in minutes
    pub time: Option<f64>,
    pub inverse_reduced_ion_mobility: Option<f64>,
    pub window: ScanWindow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWindow {
    pub lower_limit: Option<f64>,
    pub upper_limit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Precursor {
    pub mz: Option<f64>,
    pub charge_state: Option<i64>,
    pub isolation_window: IsolationWindow,
}

impl Precursor {
    /// Fall back to the isolation window target when no m/z was given
    pub fn fill_mz_from_isolation_window(&mut self) {
        if self.mz.is_none() {
            self.mz = self.isolation_window.mz;
        }
    }
}

impl MapTarget for Precursor {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        self.isolation_window.slot(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub mz: Option<f64>,
    pub isolation_window: IsolationWindow,
}

impl Product {
    /// Fall back to the isolation window target when no m/z was given
    pub fn fill_mz_from_isolation_window(&mut self) {
        if self.mz.is_none() {
            self.mz = self.isolation_window.mz;
        }
    }
}

impl MapTarget for Product {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        self.isolation_window.slot(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsolationWindow {
    pub mz: Option<f64>,
    pub lower_offset: Option<f64>,
    pub upper_offset: Option<f64>,
}

impl IsolationWindow {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        match field {
            Field::IsolationWindowMz => Some(Slot::Number(&mut self.mz)),
            Field::IsolationWindowLowerOffset => Some(Slot::Number(&mut self.lower_offset)),
            Field::IsolationWindowUpperOffset => Some(Slot::Number(&mut self.upper_offset)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collision {
    #[serde(rename = "type")]
    pub collision_type: Option<String>,
    pub energy: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasePeak {
    pub mz: Option<f64>,
    pub intensity: Option<f64>,
}

/// Paired m/z and intensity values
///
/// Both sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumArray {
    mz: Vec<f64>,
    intensity: Vec<f64>,
}

impl SpectrumArray {
    /// Pair up two sequences, truncating the longer one
    pub fn new(mut mz: Vec<f64>, mut intensity: Vec<f64>) -> Self {
        if mz.len() != intensity.len() {
            warn!(
                "m/z and intensity arrays differ in length ({} vs {}), truncating",
                mz.len(),
                intensity.len()
            );
            let len = mz.len().min(intensity.len());
            mz.truncate(len);
            intensity.truncate(len);
        }
        Self { mz, intensity }
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    pub fn mz(&self) -> &[f64] {
        &self.mz
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// Iterate over `(mz, intensity)` points
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mz.iter().copied().zip(self.intensity.iter().copied())
    }

    pub fn clear(&mut self) {
        self.mz.clear();
        self.intensity.clear();
    }
}

impl FromIterator<(f64, f64)> for SpectrumArray {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let (mz, intensity) = iter.into_iter().unzip();
        Self { mz, intensity }
    }
}

impl Serialize for SpectrumArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SpectrumArray", 3)?;
        state.serialize_field("length", &self.len())?;
        state.serialize_field("mz", &self.mz)?;
        state.serialize_field("intensity", &self.intensity)?;
        state.end()
    }
}

/// A single chromatogram
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chromatogram {
    pub index: usize,
    pub id: String,
    #[serde(rename = "type")]
    pub chromatogram_type: Option<String>,
    pub polarity: Option<String>,
    /// Kept as a number like the other count fields, but not forced to an
    /// integer since instruments report fractional dwell times
    pub dwell_time: Option<f64>,
    pub precursor: Precursor,
    pub collision: Collision,
    pub product: Product,
    pub array: ChromatogramArray,
}

impl Chromatogram {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, chromatogram_type: impl Into<String>) -> Self {
        self.chromatogram_type = Some(chromatogram_type.into());
        self
    }
}

impl MapTarget for Chromatogram {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        let slot = match field {
            Field::Type => Slot::Text(&mut self.chromatogram_type),
            Field::Polarity => Slot::Text(&mut self.polarity),
            Field::DwellTime => Slot::Number(&mut self.dwell_time),
            Field::PrecursorMz => Slot::Number(&mut self.precursor.mz),
            Field::PrecursorChargeState => Slot::Integer(&mut self.precursor.charge_state),
            Field::CollisionType => Slot::Text(&mut self.collision.collision_type),
            Field::CollisionEnergy => Slot::Number(&mut self.collision.energy),
            _ => return None,
        };
        Some(slot)
    }
}

/// Time, intensity and ms level triples
///
/// The three sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromatogramArray {
    time: Vec<Option<f64>>,
    intensity: Vec<Option<f64>>,
    ms_level: Vec<Option<i64>>,
}

impl ChromatogramArray {
    /// Build from decoded time and intensity arrays, truncating the longer one
    ///
    /// Decoded chromatograms carry no ms level, so those entries are null.
    pub fn from_decoded(mut time: Vec<f64>, mut intensity: Vec<f64>) -> Self {
        if time.len() != intensity.len() {
            warn!(
                "time and intensity arrays differ in length ({} vs {}), truncating",
                time.len(),
                intensity.len()
            );
            let len = time.len().min(intensity.len());
            time.truncate(len);
            intensity.truncate(len);
        }
        let len = time.len();
        Self {
            time: time.into_iter().map(Some).collect(),
            intensity: intensity.into_iter().map(Some).collect(),
            ms_level: vec![None; len],
        }
    }

    /// Append one point
    pub fn push(&mut self, time: Option<f64>, intensity: Option<f64>, ms_level: Option<i64>) {
        self.time.push(time);
        self.intensity.push(intensity);
        self.ms_level.push(ms_level);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[Option<f64>] {
        &self.time
    }

    pub fn intensity(&self) -> &[Option<f64>] {
        &self.intensity
    }

    pub fn ms_level(&self) -> &[Option<i64>] {
        &self.ms_level
    }
}

impl Serialize for ChromatogramArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChromatogramArray", 4)?;
        state.serialize_field("length", &self.len())?;
        state.serialize_field("time", &self.time)?;
        state.serialize_field("intensity", &self.intensity)?;
        state.serialize_field("msLevel", &self.ms_level)?;
        state.end()
    }
}

/// Decoder settings read from a `binaryDataArray`
///
/// Filled by the vocabulary mapper; all three must be known to decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryArrayParams {
    pub encoding: Option<BinaryEncoding>,
    pub compression: Option<String>,
    pub array: Option<String>,
}

impl MapTarget for BinaryArrayParams {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        match field {
            Field::EncodingType => Some(Slot::Encoding(&mut self.encoding)),
            Field::Compression => Some(Slot::Text(&mut self.compression)),
            Field::Array => Some(Slot::Text(&mut self.array)),
            _ => None,
        }
    }
}
