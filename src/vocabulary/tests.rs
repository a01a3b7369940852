use super::*;
use crate::mzml::{BinaryEncoding, CvParam};

#[derive(Debug, Default)]
struct Record {
    ms_level: Option<i64>,
    polarity: Option<String>,
    scan_time: Option<f64>,
    precursor_mz: Option<f64>,
    dwell_time: Option<f64>,
    encoding: Option<BinaryEncoding>,
}

impl MapTarget for Record {
    fn slot(&mut self, field: Field) -> Option<Slot<'_>> {
        match field {
            Field::MsLevel => Some(Slot::Integer(&mut self.ms_level)),
            Field::Polarity => Some(Slot::Text(&mut self.polarity)),
            Field::ScanTime => Some(Slot::Number(&mut self.scan_time)),
            Field::PrecursorMz => Some(Slot::Number(&mut self.precursor_mz)),
            Field::DwellTime => Some(Slot::Number(&mut self.dwell_time)),
            Field::EncodingType => Some(Slot::Encoding(&mut self.encoding)),
            _ => None,
        }
    }
}

#[test]
fn test_round_value() {
    assert_eq!(round_value(1.23456, 2), 1.23);
    assert_eq!(round_value(1.235, 1), 1.2);
    assert_eq!(round_value(2.5, 0), 2.0);
    assert_eq!(round_value(3.5, 0), 4.0);
    assert_eq!(round_value(-2.5, 0), -2.0);
    assert_eq!(round_value(150.00049, 3), 150.0);
    assert_eq!(round_value(f64::MAX, 4), f64::MAX);
    assert!(round_value(f64::NAN, 2).is_nan());
}

#[test]
fn test_round_value_high_precision_is_stable() {
    let once = round_value(69.21658556265909, 14);
    assert_eq!(round_value(once, 14), once);

    let once = round_value(1234.5678901234567, 15);
    assert_eq!(round_value(once, 15), once);
}

#[test]
fn test_round_value_caps_places() {
    assert_eq!(round_value(123.456, u32::MAX), 123.456);
    assert_eq!(round_value(0.1234567890123456789, 40), round_value(0.1234567890123456789, 15));
}

#[test]
fn test_precision_full_is_identity() {
    assert_eq!(Precision::Full.apply(1.23456789), 1.23456789);
    assert_eq!(Precision::Decimals(4).apply(1.23456789), 1.2346);
}

#[test]
fn test_flag_terms_use_literal_values() {
    let mut record = Record::default();
    map_params(
        &[CvParam::named("negative scan", ""), CvParam::named("64-bit float", "")],
        &mut record,
        Precision::Full,
    );
    assert_eq!(record.polarity.as_deref(), Some("negative"));
    assert_eq!(record.encoding, Some(BinaryEncoding::Float64));
}

#[test]
fn test_first_writer_wins() {
    let mut record = Record::default();
    map_params(
        &[
            CvParam::named("selected ion m/z", "445.12"),
            CvParam::named("selected precursor m/z", "999.99"),
        ],
        &mut record,
        Precision::Full,
    );
    assert_eq!(record.precursor_mz, Some(445.12));

    // A later call does not replace an earlier value either
    map_params(
        &[CvParam::named("selected ion m/z", "1.0")],
        &mut record,
        Precision::Full,
    );
    assert_eq!(record.precursor_mz, Some(445.12));
}

#[test]
fn test_scan_time_seconds_become_minutes() {
    let mut seconds = Record::default();
    map_params(
        &[CvParam::named("scan start time", "90").with_unit("second")],
        &mut seconds,
        Precision::Full,
    );
    assert_eq!(seconds.scan_time, Some(1.5));

    let mut minutes = Record::default();
    map_params(
        &[CvParam::named("scan start time", "1.25").with_unit("minute")],
        &mut minutes,
        Precision::Full,
    );
    assert_eq!(minutes.scan_time, Some(1.25));
}

#[test]
fn test_measurements_are_rounded_counts_are_not() {
    let mut record = Record::default();
    map_params(
        &[
            CvParam::named("selected ion m/z", "445.123456"),
            CvParam::named("MS_dwell_time", "0.123456"),
        ],
        &mut record,
        Precision::Decimals(2),
    );
    assert_eq!(record.precursor_mz, Some(445.12));
    assert_eq!(record.dwell_time, Some(0.123456));
}

#[test]
fn test_integer_fields() {
    let mut record = Record::default();
    map_params(&[CvParam::named("ms level", "2")], &mut record, Precision::Full);
    assert_eq!(record.ms_level, Some(2));

    let mut fractional = Record::default();
    map_params(
        &[CvParam::named("ms level", "1.5"), CvParam::named("ms level", "3")],
        &mut fractional,
        Precision::Full,
    );
    assert_eq!(fractional.ms_level, Some(3));
}

#[test]
fn test_empty_and_invalid_values_are_absent() {
    let mut record = Record::default();
    map_params(
        &[
            CvParam::named("ms level", ""),
            CvParam::named("scan start time", "n/a"),
        ],
        &mut record,
        Precision::Full,
    );
    assert_eq!(record.ms_level, None);
    assert_eq!(record.scan_time, None);
}

#[test]
fn test_unknown_terms_and_fields_are_skipped() {
    let mut record = Record::default();
    map_params(
        &[
            CvParam::named("filter string", "FTMS + p ESI Full ms"),
            // known term, but Record has no collision energy
            CvParam::named("collision energy", "35"),
        ],
        &mut record,
        Precision::Full,
    );
    assert!(record.ms_level.is_none());
    assert!(record.scan_time.is_none());
}

#[test]
fn test_accession_fallback() {
    let mut record = Record::default();
    let param = CvParam::named("MS level (legacy name)", "2").with_accession("MS:1000511");
    map_params(&[param], &mut record, Precision::Full);
    assert_eq!(record.ms_level, Some(2));
}

#[test]
fn test_vendor_ids() {
    let term = tables::lookup_key("pwiz_Reader_Thermo_conversion").unwrap();
    assert_eq!(term.field, Field::InstrumentVendor);
    assert_eq!(term.literal, Some(Literal::Text("Thermo Fisher Scientific")));
}

#[test]
fn test_table_keys_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for term in tables::TERMS {
        assert!(seen.insert(term.key), "duplicate key {}", term.key);
    }

    let mut accessions = std::collections::HashSet::new();
    for acc in tables::TERMS.iter().filter_map(|t| t.accession) {
        assert!(accessions.insert(acc), "duplicate accession {acc}");
    }
}

#[test]
fn test_field_paths_and_kinds() {
    assert_eq!(Field::ScanWindowUpperLimit.path(), "scan.window.upperLimit");
    assert_eq!(Field::DwellTime.kind(), FieldKind::Count);
    assert_eq!(Field::CollisionEnergy.kind(), FieldKind::Measurement);
    assert_eq!(Field::Array.kind(), FieldKind::Text);
}
