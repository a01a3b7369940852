//! Property-based tests for decoding, rounding, mapping and filtering

use std::io::Write;

use base64::Engine;
use exfilms::extraction::{
    apply_range_filter, apply_target_filter, MzRange, Polarity, Spectrum, TargetFilter,
};
use exfilms::mzml::{BinaryDecoder, BinaryEncoding, CompressionType, CvParam};
use exfilms::targets::{TargetEntry, TargetList};
use exfilms::vocabulary::{map_params, round_value, Precision, MAX_DECIMAL_PLACES};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use proptest::prelude::*;

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

/// Sorted m/z values with matching intensities
fn peaks() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((50.0f64..2000.0, 0.0f64..1e7), 0..60).prop_map(|mut points| {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    })
}

fn spectrum(points: &[(f64, f64)], ms_level: i64, polarity: &str) -> Spectrum {
    let mut spectrum = Spectrum::new(0, "scan=1");
    spectrum.ms_level = Some(ms_level);
    spectrum.polarity = Some(polarity.to_string());
    spectrum.array = points.iter().copied().collect();
    spectrum
}

proptest! {
    /// Any finite f64 array survives base64 and zlib unchanged
    #[test]
    fn test_f64_zlib_roundtrip(values in prop::collection::vec(finite_f64(), 0..100)) {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        let encoded = base64::engine::general_purpose::STANDARD.encode(encoder.finish().unwrap());

        let decoded = BinaryDecoder::decode(&encoded, BinaryEncoding::Float64, CompressionType::Zlib).unwrap();
        prop_assert_eq!(decoded, values);
    }

    /// f32 arrays widen to f64 exactly
    #[test]
    fn test_f32_roundtrip(values in prop::collection::vec(any::<f32>().prop_filter("finite", |v| v.is_finite()), 0..100)) {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let decoded = BinaryDecoder::decode(&encoded, BinaryEncoding::Float32, CompressionType::None).unwrap();
        prop_assert_eq!(decoded.len(), values.len());
        for (original, decoded) in values.iter().zip(decoded.iter()) {
            prop_assert_eq!(*original as f64, *decoded);
        }
    }

    /// Buffers that are not a whole number of elements are rejected
    #[test]
    fn test_partial_element_rejected(len in 1usize..64) {
        prop_assume!(len % 8 != 0);
        let encoded = base64::engine::general_purpose::STANDARD.encode(vec![0u8; len]);
        prop_assert!(BinaryDecoder::decode(&encoded, BinaryEncoding::Float64, CompressionType::None).is_err());
    }

    /// Rounding twice gives the same result as rounding once
    #[test]
    fn test_rounding_idempotent(value in finite_f64(), places in 0u32..=MAX_DECIMAL_PLACES) {
        let once = round_value(value, places);
        prop_assert_eq!(round_value(once, places), once);
    }

    /// Rounding moves a moderate value by at most half a unit in the last place
    #[test]
    fn test_rounding_error_bounded(value in -1e6f64..1e6, places in 0u32..7) {
        let once = round_value(value, places);
        prop_assert!((once - value).abs() <= 0.5 / 10f64.powi(places as i32) + 1e-9);
    }

    /// Precision beyond the supported maximum behaves like the maximum
    #[test]
    fn test_rounding_places_clamped(
        value in finite_f64(),
        places in (MAX_DECIMAL_PLACES + 1)..=u32::MAX,
    ) {
        prop_assert_eq!(round_value(value, places), round_value(value, MAX_DECIMAL_PLACES));
    }

    /// Synonymous terms never overwrite the first value
    #[test]
    fn test_first_writer_wins(first in 1i64..10, second in 1i64..10, time in 0.0f64..1e4) {
        let params = vec![
            CvParam::named("ms level", first.to_string()),
            CvParam::named("ms level", second.to_string()),
            CvParam::named("scan start time", time.to_string()).with_unit("minute"),
            CvParam::named("scan start time", "99999").with_unit("minute"),
        ];
        let mut spectrum = Spectrum::new(0, "scan=1");
        map_params(&params, &mut spectrum, Precision::Full);
        map_params(&params[1..2], &mut spectrum, Precision::Full);

        prop_assert_eq!(spectrum.ms_level, Some(first));
        prop_assert_eq!(spectrum.scan.time, Some(time));
    }

    /// The target filter emits exactly one point per eligible target
    #[test]
    fn test_target_cardinality(
        points in peaks(),
        targets in prop::collection::vec((50.0f64..2000.0, 1i64..3, any::<bool>()), 1..20),
    ) {
        let entries = targets
            .iter()
            .map(|&(mz, level, positive)| {
                let polarity = if positive { Polarity::Positive } else { Polarity::Negative };
                TargetEntry::new(mz, level, polarity)
            })
            .collect();
        let filter = TargetFilter::new(TargetList::new(entries));
        let eligible: Vec<f64> = filter
            .targets
            .matching(Some(1), Some(Polarity::Positive))
            .map(|t| t.mz)
            .collect();

        let mut spectrum = spectrum(&points, 1, "positive");
        let hits = apply_target_filter(&mut spectrum, &filter);

        prop_assert_eq!(hits.len(), eligible.len());
        prop_assert_eq!(spectrum.array.len(), eligible.len());
        for (hit, target_mz) in hits.iter().zip(&eligible) {
            let tolerance = filter.tolerance_for(*target_mz);
            prop_assert!((hit.mz - target_mz).abs() <= tolerance);
        }
        let total: f64 = hits.iter().map(|h| h.intensity).sum();
        prop_assert_eq!(spectrum.total_ion_current, Some(total));
    }

    /// Range filtering keeps an ordered subset within the bounds
    #[test]
    fn test_range_subset(points in peaks(), min in 0.0f64..1000.0, width in 1.0f64..1500.0) {
        let range = MzRange::new(min, Some(min + width)).unwrap();
        let mut spectrum = spectrum(&points, 1, "positive");
        apply_range_filter(&mut spectrum, &range);

        let expected: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|(mz, _)| *mz >= min && *mz <= min + width)
            .collect();
        let kept: Vec<(f64, f64)> = spectrum.array.points().collect();
        prop_assert_eq!(&kept, &expected);

        let total: f64 = expected.iter().map(|(_, i)| i).sum();
        prop_assert_eq!(spectrum.total_ion_current, Some(total));
        let max = expected.iter().map(|(_, i)| *i).fold(0.0, f64::max);
        prop_assert_eq!(spectrum.base_peak.intensity, Some(max));
    }

    /// Widening the range never drops points
    #[test]
    fn test_range_monotonic(points in peaks(), min in 0.0f64..1000.0, width in 1.0f64..500.0, extra in 0.0f64..500.0) {
        let mut narrow = spectrum(&points, 1, "positive");
        let mut wide = narrow.clone();
        apply_range_filter(&mut narrow, &MzRange::new(min, Some(min + width)).unwrap());
        apply_range_filter(&mut wide, &MzRange::new(min, Some(min + width + extra)).unwrap());

        prop_assert!(narrow.array.len() <= wide.array.len());
        prop_assert!(narrow.total_ion_current <= wide.total_ion_current);
    }
}
