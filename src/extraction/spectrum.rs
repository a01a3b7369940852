//! Spectrum Extractor
//!
//! Builds one [`Spectrum`] per `spectrum` element, filters its arrays and
//! feeds the retained spectra into the aggregate chromatograms.

use log::debug;

use super::arrays::decode_arrays;
use super::chromatogram::{ChromatogramSet, BPC_ID, TIC_ID};
use super::config::{ArrayFilter, ExtractionConfig};
use super::filter::{apply_range_filter, apply_target_filter};
use super::models::{Spectrum, SpectrumArray};
use crate::mzml::{CvParam, MzMLError, MzMLNode};
use crate::vocabulary::{map_params, Precision};

/// Spectra retained from a `spectrumList`, with the chromatograms built from them
#[derive(Debug, Default)]
pub struct SpectrumExtraction {
    pub spectra: Vec<Spectrum>,
    pub chromatograms: ChromatogramSet,
}

/// Run every `spectrum` element of `spectrum_list` through mapping, filtering
/// and classification
pub fn extract_spectra(
    spectrum_list: &MzMLNode,
    config: &ExtractionConfig,
) -> Result<SpectrumExtraction, MzMLError> {
    let mut spectra = Vec::new();
    let mut chromatograms = ChromatogramSet::for_spectra(config.targets());

    for (position, node) in spectrum_list.children_named("spectrum").enumerate() {
        let mut spectrum = build_spectrum(node, position, config.precision)?;
        let retained = config.accepts(&spectrum);

        match &config.array_filter {
            ArrayFilter::Target(filter) => {
                let hits = apply_target_filter(&mut spectrum, filter);
                if config.feeds_selected_ions(&spectrum) {
                    for hit in &hits {
                        chromatograms.append(
                            &hit.target.chromatogram_id(),
                            spectrum.scan.time,
                            Some(hit.intensity),
                            spectrum.ms_level,
                        );
                    }
                }
            }
            ArrayFilter::Range(range) => apply_range_filter(&mut spectrum, range),
            ArrayFilter::None => {}
        }

        if config.metadata_only {
            spectrum.array.clear();
        }

        if !retained {
            debug!("Dropping spectrum {} by classification", spectrum.id);
            continue;
        }

        spectrum.index = spectra.len();
        chromatograms.append(
            TIC_ID,
            spectrum.scan.time,
            spectrum.total_ion_current,
            spectrum.ms_level,
        );
        chromatograms.append(
            BPC_ID,
            spectrum.scan.time,
            spectrum.base_peak.intensity,
            spectrum.ms_level,
        );
        spectra.push(spectrum);
    }

    Ok(SpectrumExtraction {
        spectra,
        chromatograms,
    })
}

/// Map and decode a single `spectrum` element, before any filtering
///
/// Sections are mapped from the most specific record-level terms outwards, so
/// a term on the spectrum itself wins over the same term on its scan or
/// precursor.
pub fn build_spectrum(
    node: &MzMLNode,
    position: usize,
    precision: Precision,
) -> Result<Spectrum, MzMLError> {
    let id = node
        .attr("id")
        .ok_or_else(|| MzMLError::MissingAttribute("spectrum@id".to_string()))?;
    let index = node
        .attr("index")
        .and_then(|i| i.trim().parse().ok())
        .unwrap_or(position);
    let default_length = node
        .attr("defaultArrayLength")
        .and_then(|l| l.trim().parse().ok());

    let mut spectrum = Spectrum::new(index, id);

    map_params(&CvParam::collect(Some(node), "cvParam"), &mut spectrum, precision);
    map_params(&CvParam::collect(Some(node), "userParam"), &mut spectrum, precision);

    let scan = node.descend(&["scanList", "scan"]);
    map_params(&CvParam::collect(scan, "cvParam"), &mut spectrum, precision);
    map_params(&CvParam::collect(scan, "userParam"), &mut spectrum, precision);
    map_params(
        &CvParam::collect(
            scan.and_then(|s| s.descend(&["scanWindowList", "scanWindow"])),
            "cvParam",
        ),
        &mut spectrum,
        precision,
    );

    let precursor = node.descend(&["precursorList", "precursor"]);
    map_params(
        &CvParam::collect(precursor.and_then(|p| p.child("isolationWindow")), "cvParam"),
        &mut spectrum.precursor,
        precision,
    );
    map_params(
        &CvParam::collect(
            precursor.and_then(|p| p.descend(&["selectedIonList", "selectedIon"])),
            "cvParam",
        ),
        &mut spectrum,
        precision,
    );
    spectrum.precursor.fill_mz_from_isolation_window();
    map_params(
        &CvParam::collect(precursor.and_then(|p| p.child("activation")), "cvParam"),
        &mut spectrum,
        precision,
    );

    let decoded = decode_arrays(node, id, default_length, precision);
    spectrum.array = SpectrumArray::new(
        decoded.mz.unwrap_or_default(),
        decoded.intensity.unwrap_or_default(),
    );
    fill_base_peak(&mut spectrum);

    Ok(spectrum)
}

/// Derive the base peak from the arrays when the document does not state it
///
/// The first point with the highest intensity is used. Nothing is derived
/// from empty arrays.
pub fn fill_base_peak(spectrum: &mut Spectrum) {
    if spectrum.base_peak.mz.is_some() {
        return;
    }

    let mut best: Option<(f64, f64)> = None;
    for (mz, intensity) in spectrum.array.points() {
        if best.map_or(true, |(_, top)| intensity > top) {
            best = Some((mz, intensity));
        }
    }

    if let Some((mz, intensity)) = best {
        spectrum.base_peak.mz = Some(mz);
        spectrum.base_peak.intensity.get_or_insert(intensity);
    }
}
