//! Spectrum array filters
//!
//! Both filters rebuild the m/z and intensity arrays of a single spectrum and
//! recompute its total ion current and base peak from what they keep.

use super::config::{MzRange, Polarity, TargetFilter};
use super::models::{Spectrum, SpectrumArray};
use crate::targets::TargetEntry;

/// Intensity recorded for a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetHit<'a> {
    pub target: &'a TargetEntry,
    /// Matched m/z, or the target m/z when nothing matched
    pub mz: f64,
    /// Matched intensity, or 0 when nothing matched
    pub intensity: f64,
}

/// Relative mass error of `mz` against `target`, in ppm
pub fn ppm_error(mz: f64, target: f64) -> f64 {
    ((mz - target) / target * 1e6).abs()
}

/// Point inside `[target - tolerance, target + tolerance]` with the smallest ppm error
///
/// Ties keep the earliest point.
pub fn nearest_match(array: &SpectrumArray, target: f64, tolerance: f64) -> Option<(f64, f64)> {
    let (low, high) = (target - tolerance, target + tolerance);
    let mut best: Option<(f64, f64, f64)> = None;

    for (mz, intensity) in array.points() {
        if mz < low || mz > high {
            continue;
        }
        let ppm = ppm_error(mz, target);
        if best.map_or(true, |(_, _, best_ppm)| ppm < best_ppm) {
            best = Some((mz, intensity, ppm));
        }
    }

    best.map(|(mz, intensity, _)| (mz, intensity))
}

/// Reduce the spectrum to one point per eligible target
///
/// Targets are restricted to the spectrum's ms level and polarity. Targets
/// without a match inside their tolerance window are emitted with intensity 0.
pub fn apply_target_filter<'a>(spectrum: &mut Spectrum, filter: &'a TargetFilter) -> Vec<TargetHit<'a>> {
    let polarity = spectrum
        .polarity
        .as_deref()
        .and_then(|p| p.parse::<Polarity>().ok());
    let hits: Vec<TargetHit<'a>> = filter
        .targets
        .matching(spectrum.ms_level, polarity)
        .map(|target| {
            let tolerance = filter.tolerance_for(target.mz);
            let (mz, intensity) =
                nearest_match(&spectrum.array, target.mz, tolerance).unwrap_or((target.mz, 0.0));
            TargetHit {
                target,
                mz,
                intensity,
            }
        })
        .collect();

    replace_points(spectrum, hits.iter().map(|hit| (hit.mz, hit.intensity)).collect());
    hits
}

/// Keep only the points inside `range`, preserving their order
///
/// An open upper bound is taken from the spectrum's last m/z value.
pub fn apply_range_filter(spectrum: &mut Spectrum, range: &MzRange) {
    let Some(max) = range.max().or_else(|| spectrum.array.mz().last().copied()) else {
        replace_points(spectrum, SpectrumArray::default());
        return;
    };
    let min = range.min();

    let kept: SpectrumArray = spectrum
        .array
        .points()
        .filter(|(mz, _)| *mz >= min && *mz <= max)
        .collect();
    replace_points(spectrum, kept);
}

/// Install new arrays and recompute the aggregates over them
fn replace_points(spectrum: &mut Spectrum, array: SpectrumArray) {
    let mut total = 0.0;
    let (mut base_mz, mut base_intensity) = (0.0, 0.0);
    for (mz, intensity) in array.points() {
        total += intensity;
        if intensity > base_intensity {
            base_mz = mz;
            base_intensity = intensity;
        }
    }

    spectrum.total_ion_current = Some(total);
    spectrum.base_peak.mz = Some(base_mz);
    spectrum.base_peak.intensity = Some(base_intensity);
    spectrum.array = array;
}
