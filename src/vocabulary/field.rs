//! Normalized destination fields and the typed slots they are written into

use crate::mzml::BinaryEncoding;

/// A normalized destination field
///
/// Each field has a dotted path in the output layout (relative to the record
/// it belongs to) and a [`FieldKind`] deciding how raw values are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    InstrumentVendor,
    InstrumentSerialNumber,
    MsLevel,
    /// Spectrum representation or chromatogram type
    Type,
    Polarity,
    ScanType,
    TotalIonCurrent,
    BasePeakMz,
    BasePeakIntensity,
    ScanTime,
    ScanInverseReducedIonMobility,
    ScanWindowLowerLimit,
    ScanWindowUpperLimit,
    PrecursorMz,
    PrecursorChargeState,
    /// Relative to a precursor or product record
    IsolationWindowMz,
    IsolationWindowLowerOffset,
    IsolationWindowUpperOffset,
    CollisionEnergy,
    CollisionType,
    /// Element width of a binary array
    EncodingType,
    /// Compression of a binary array
    Compression,
    /// Role of a binary array (`mz`, `intensity`, `time`)
    Array,
    DwellTime,
}

/// How a raw value is coerced before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Identifier or category, stored as a string
    Text,
    /// Counted quantity, stored as a number without rounding
    Count,
    /// Continuous measurement, stored as a number and rounded to the precision
    Measurement,
    /// Binary element width, only ever set from the literal table
    Encoding,
}

impl Field {
    /// Dotted path of this field in the output layout
    pub fn path(&self) -> &'static str {
        match self {
            Field::InstrumentVendor => "instrument.vendor",
            Field::InstrumentSerialNumber => "instrument.serialNumber",
            Field::MsLevel => "msLevel",
            Field::Type => "type",
            Field::Polarity => "polarity",
            Field::ScanType => "scan.type",
            Field::TotalIonCurrent => "totalIonCurrent",
            Field::BasePeakMz => "basePeak.mz",
            Field::BasePeakIntensity => "basePeak.intensity",
            Field::ScanTime => "scan.time",
            Field::ScanInverseReducedIonMobility => "scan.inverseReducedIonMobility",
            Field::ScanWindowLowerLimit => "scan.window.lowerLimit",
            Field::ScanWindowUpperLimit => "scan.window.upperLimit",
            Field::PrecursorMz => "precursor.mz",
            Field::PrecursorChargeState => "precursor.chargeState",
            Field::IsolationWindowMz => "isolationWindow.mz",
            Field::IsolationWindowLowerOffset => "isolationWindow.lowerOffset",
            Field::IsolationWindowUpperOffset => "isolationWindow.upperOffset",
            Field::CollisionEnergy => "collision.energy",
            Field::CollisionType => "collision.type",
            Field::EncodingType => "base64.type",
            Field::Compression => "base64.compression",
            Field::Array => "array",
            Field::DwellTime => "dwellTime",
        }
    }

    /// Coercion class of this field
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::InstrumentVendor
            | Field::InstrumentSerialNumber
            | Field::Type
            | Field::Polarity
            | Field::ScanType
            | Field::CollisionType
            | Field::Compression
            | Field::Array => FieldKind::Text,

            Field::MsLevel | Field::PrecursorChargeState | Field::DwellTime => FieldKind::Count,

            Field::TotalIonCurrent
            | Field::BasePeakMz
            | Field::BasePeakIntensity
            | Field::ScanTime
            | Field::ScanInverseReducedIonMobility
            | Field::ScanWindowLowerLimit
            | Field::ScanWindowUpperLimit
            | Field::PrecursorMz
            | Field::IsolationWindowMz
            | Field::IsolationWindowLowerOffset
            | Field::IsolationWindowUpperOffset
            | Field::CollisionEnergy => FieldKind::Measurement,

            Field::EncodingType => FieldKind::Encoding,
        }
    }
}

/// Mutable access to the storage behind a [`Field`] on some record
pub enum Slot<'a> {
    Text(&'a mut Option<String>),
    Integer(&'a mut Option<i64>),
    Number(&'a mut Option<f64>),
    Encoding(&'a mut Option<BinaryEncoding>),
}

impl Slot<'_> {
    /// Whether a value has already been written
    pub fn is_set(&self) -> bool {
        match self {
            Slot::Text(v) => v.is_some(),
            Slot::Integer(v) => v.is_some(),
            Slot::Number(v) => v.is_some(),
            Slot::Encoding(v) => v.is_some(),
        }
    }
}

/// A record the vocabulary mapper can write into
///
/// Returns `None` for fields the record does not carry; the mapper skips
/// those terms.
pub trait MapTarget {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>>;
}
