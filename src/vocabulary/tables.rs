//! Static vocabulary tables
//!
//! Every recognised term is listed once in [`TERMS`]. The lookup maps built
//! from it are process-wide constants, created on first use and never
//! modified afterwards.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::field::Field;
use crate::mzml::{BinaryEncoding, CvParam};

/// Fixed replacement value for a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Text(&'static str),
    Encoding(BinaryEncoding),
}

/// One row of the vocabulary table
#[derive(Debug, Clone, Copy)]
pub struct Term {
    /// Term name, or element id for `software`/`dataProcessing`
    pub key: &'static str,
    /// PSI-MS accession, when the term has one
    pub accession: Option<&'static str>,
    pub field: Field,
    /// Replaces the term's own value when present
    pub literal: Option<Literal>,
}

const fn term(key: &'static str, accession: &'static str, field: Field) -> Term {
    Term {
        key,
        accession: Some(accession),
        field,
        literal: None,
    }
}

const fn flag(key: &'static str, accession: &'static str, field: Field, text: &'static str) -> Term {
    Term {
        key,
        accession: Some(accession),
        field,
        literal: Some(Literal::Text(text)),
    }
}

const fn vendor(key: &'static str, name: &'static str) -> Term {
    Term {
        key,
        accession: None,
        field: Field::InstrumentVendor,
        literal: Some(Literal::Text(name)),
    }
}

const fn activation(key: &'static str, accession: &'static str) -> Term {
    flag(key, accession, Field::CollisionType, key)
}

const fn encoding(key: &'static str, accession: &'static str, encoding: BinaryEncoding) -> Term {
    Term {
        key,
        accession: Some(accession),
        field: Field::EncodingType,
        literal: Some(Literal::Encoding(encoding)),
    }
}

/// All recognised terms
pub static TERMS: &[Term] = &[
    // softwareList/software
    vendor("pwiz_Reader_ABI", "SCIEX"),
    vendor("pwiz_Reader_Bruker", "Bruker Daltonics"),
    vendor("pwiz_Reader_Waters", "Waters Corporation"),
    vendor("pwiz_Reader_UNIFI", "Waters Corporation"),
    vendor("pwiz_Reader_ABI_T2D", "Applied Biosystems"),
    // dataProcessingList/dataProcessing
    vendor("pwiz_Reader_ABI_conversion", "SCIEX"),
    vendor("pwiz_Reader_Bruker_conversion", "Bruker Daltonics"),
    vendor("pwiz_Reader_Shimadzu_conversion", "Shimadzu Corporation"),
    vendor("pwiz_Reader_Waters_conversion", "Waters Corporation"),
    vendor("pwiz_Reader_UNIFI_conversion", "Waters Corporation"),
    vendor("pwiz_Reader_Thermo_conversion", "Thermo Fisher Scientific"),
    vendor("pwiz_Reader_Agilent_conversion", "Agilent Technologies"),
    vendor("pwiz_Reader_ABI_T2D_conversion", "Applied Biosystems"),
    // instrumentConfiguration
    term("instrument serial number", "MS:1000529", Field::InstrumentSerialNumber),
    // spectrum
    term("ms level", "MS:1000511", Field::MsLevel),
    flag("centroid spectrum", "MS:1000127", Field::Type, "centroid"),
    flag("profile spectrum", "MS:1000128", Field::Type, "profile"),
    flag("negative scan", "MS:1000129", Field::Polarity, "negative"),
    flag("positive scan", "MS:1000130", Field::Polarity, "positive"),
    flag("MS1 spectrum", "MS:1000579", Field::ScanType, "MS1 spectrum"),
    flag("MSn spectrum", "MS:1000580", Field::ScanType, "MSn spectrum"),
    flag(
        "CRM spectrum",
        "MS:1000581",
        Field::ScanType,
        "consecutive reaction monitoring spectrum",
    ),
    flag(
        "SIM spectrum",
        "MS:1000582",
        Field::ScanType,
        "selected ion monitoring spectrum",
    ),
    flag(
        "SRM spectrum",
        "MS:1000583",
        Field::ScanType,
        "selected reaction monitoring spectrum",
    ),
    term("total ion current", "MS:1000285", Field::TotalIonCurrent),
    term("base peak m/z", "MS:1000504", Field::BasePeakMz),
    term("base peak intensity", "MS:1000505", Field::BasePeakIntensity),
    // scan
    term("scan start time", "MS:1000016", Field::ScanTime),
    term(
        "inverse reduced ion mobility",
        "MS:1002815",
        Field::ScanInverseReducedIonMobility,
    ),
    // scanWindow
    term("scan window upper limit", "MS:1000500", Field::ScanWindowUpperLimit),
    term("scan window lower limit", "MS:1000501", Field::ScanWindowLowerLimit),
    // selectedIon
    term("selected ion m/z", "MS:1000744", Field::PrecursorMz),
    term("selected precursor m/z", "MS:1002234", Field::PrecursorMz),
    term("charge state", "MS:1000041", Field::PrecursorChargeState),
    // isolationWindow
    term("isolation window target m/z", "MS:1000827", Field::IsolationWindowMz),
    term(
        "isolation window lower offset",
        "MS:1000828",
        Field::IsolationWindowLowerOffset,
    ),
    term(
        "isolation window upper offset",
        "MS:1000829",
        Field::IsolationWindowUpperOffset,
    ),
    // activation
    term("collision energy", "MS:1000045", Field::CollisionEnergy),
    activation("collision-induced dissociation", "MS:1000133"),
    activation("beam-type collision-induced dissociation", "MS:1000422"),
    activation("trap-type collision-induced dissociation", "MS:1002472"),
    activation("supplemental collision-induced dissociation", "MS:1002679"),
    activation("electron capture dissociation", "MS:1000250"),
    activation("electron activated dissociation", "MS:1003294"),
    activation("photodissociation", "MS:1000435"),
    activation("infrared multiphoton dissociation", "MS:1000262"),
    activation("ultraviolet photodissociation", "MS:1003246"),
    activation("plasma desorption", "MS:1000134"),
    activation("post-source decay", "MS:1000135"),
    activation("surface-induced dissociation", "MS:1000136"),
    activation("blackbody infrared radiative dissociation", "MS:1000242"),
    activation("sustained off-resonance irradiation", "MS:1000282"),
    activation("low-energy collision-induced dissociation", "MS:1000433"),
    activation("electron transfer dissociation", "MS:1000598"),
    activation("pulsed q dissociation", "MS:1000599"),
    activation("in-source collision-induced dissociation", "MS:1001880"),
    activation("LIFT", "MS:1002000"),
    activation("negative electron transfer dissociation", "MS:1003247"),
    // binaryDataArray
    encoding("32-bit float", "MS:1000521", BinaryEncoding::Float32),
    encoding("64-bit float", "MS:1000523", BinaryEncoding::Float64),
    flag("zlib compression", "MS:1000574", Field::Compression, "zlib"),
    flag("no compression", "MS:1000576", Field::Compression, "none"),
    flag("m/z array", "MS:1000514", Field::Array, "mz"),
    flag("intensity array", "MS:1000515", Field::Array, "intensity"),
    flag("time array", "MS:1000595", Field::Array, "time"),
    // chromatogram
    flag(
        "total ion current chromatogram",
        "MS:1000235",
        Field::Type,
        "total ion chromatogram",
    ),
    flag(
        "selected ion current chromatogram",
        "MS:1000627",
        Field::Type,
        "selected ion chromatogram",
    ),
    flag(
        "basepeak chromatogram",
        "MS:1000628",
        Field::Type,
        "base peak chromatogram",
    ),
    flag(
        "selected ion monitoring chromatogram",
        "MS:1001472",
        Field::Type,
        "selected ion chromatogram",
    ),
    flag(
        "selected reaction monitoring chromatogram",
        "MS:1001473",
        Field::Type,
        "selected reaction monitoring chromatogram",
    ),
    flag(
        "consecutive reaction monitoring chromatogram",
        "MS:1001474",
        Field::Type,
        "consecutive reaction monitoring chromatogram",
    ),
    // chromatogram userParam
    Term {
        key: "MS_dwell_time",
        accession: None,
        field: Field::DwellTime,
        literal: None,
    },
];

static BY_KEY: Lazy<HashMap<&'static str, &'static Term>> =
    Lazy::new(|| TERMS.iter().map(|t| (t.key, t)).collect());

static BY_ACCESSION: Lazy<HashMap<&'static str, &'static Term>> = Lazy::new(|| {
    TERMS
        .iter()
        .filter_map(|t| t.accession.map(|acc| (acc, t)))
        .collect()
});

/// Find the table row for a parameter
///
/// The lookup key is the element `id`, else the term name; terms whose name
/// is not recognised fall back to their accession.
pub fn lookup(param: &CvParam) -> Option<&'static Term> {
    param
        .key()
        .and_then(|key| BY_KEY.get(key).copied())
        .or_else(|| {
            param
                .accession
                .as_deref()
                .and_then(|acc| BY_ACCESSION.get(acc).copied())
        })
}

/// Find the table row for a term name or element id
pub fn lookup_key(key: &str) -> Option<&'static Term> {
    BY_KEY.get(key).copied()
}
