//! Chromatogram building and extraction
//!
//! Documents with spectra get aggregate chromatograms built from the spectra
//! as they are processed ([`ChromatogramSet`]). Documents without spectra have
//! their stored chromatograms extracted directly ([`extract_chromatograms`]).

use std::collections::HashMap;

use log::warn;

use super::arrays::decode_arrays;
use super::models::{Chromatogram, ChromatogramArray};
use crate::mzml::{CvParam, MzMLError, MzMLNode};
use crate::targets::TargetList;
use crate::vocabulary::{map_params, Precision};

/// Identifier of the total ion chromatogram
pub const TIC_ID: &str = "TIC";
/// Identifier of the base peak chromatogram
pub const BPC_ID: &str = "BPC";

/// Chromatograms accumulated while spectra are processed, looked up by id
#[derive(Debug, Clone, Default)]
pub struct ChromatogramSet {
    chromatograms: Vec<Chromatogram>,
    positions: HashMap<String, usize>,
}

impl ChromatogramSet {
    /// The TIC and BPC chromatograms, plus one selected ion chromatogram per
    /// distinct target m/z when `targets` is given
    pub fn for_spectra(targets: Option<&TargetList>) -> Self {
        let mut set = Self::default();
        set.insert(Chromatogram::new(0, TIC_ID).with_type("total ion chromatogram"));
        set.insert(Chromatogram::new(1, BPC_ID).with_type("base peak chromatogram"));

        for target in targets.into_iter().flatten() {
            let id = target.chromatogram_id();
            if set.positions.contains_key(&id) {
                continue;
            }
            let mut sic = Chromatogram::new(set.len(), id).with_type("selected ion chromatogram");
            sic.precursor.mz = Some(target.mz);
            sic.precursor.isolation_window.mz = Some(target.mz);
            set.insert(sic);
        }

        set
    }

    fn insert(&mut self, chromatogram: Chromatogram) {
        self.positions
            .insert(chromatogram.id.clone(), self.chromatograms.len());
        self.chromatograms.push(chromatogram);
    }

    /// Append one point to the chromatogram with the given id
    ///
    /// Returns false (and logs) when no such chromatogram exists.
    pub fn append(
        &mut self,
        id: &str,
        time: Option<f64>,
        intensity: Option<f64>,
        ms_level: Option<i64>,
    ) -> bool {
        match self.positions.get(id) {
            Some(&position) => {
                self.chromatograms[position]
                    .array
                    .push(time, intensity, ms_level);
                true
            }
            None => {
                warn!("No chromatogram with id '{id}'");
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Chromatogram> {
        self.positions.get(id).map(|&i| &self.chromatograms[i])
    }

    pub fn len(&self) -> usize {
        self.chromatograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromatograms.is_empty()
    }

    pub fn into_vec(self) -> Vec<Chromatogram> {
        self.chromatograms
    }
}

/// Build one record per `chromatogram` element of a `chromatogramList`
///
/// No filtering applies to stored chromatograms.
pub fn extract_chromatograms(
    chromatogram_list: &MzMLNode,
    precision: Precision,
) -> Result<Vec<Chromatogram>, MzMLError> {
    chromatogram_list
        .children_named("chromatogram")
        .enumerate()
        .map(|(position, node)| build_chromatogram(node, position, precision))
        .collect()
}

/// Build a single chromatogram record
pub fn build_chromatogram(
    node: &MzMLNode,
    position: usize,
    precision: Precision,
) -> Result<Chromatogram, MzMLError> {
    let id = node
        .attr("id")
        .ok_or_else(|| MzMLError::MissingAttribute("chromatogram@id".to_string()))?;
    let index = node
        .attr("index")
        .and_then(|i| i.trim().parse().ok())
        .unwrap_or(position);
    let default_length = node
        .attr("defaultArrayLength")
        .and_then(|l| l.trim().parse().ok());

    let mut chromatogram = Chromatogram::new(index, id);

    map_params(&CvParam::collect(Some(node), "cvParam"), &mut chromatogram, precision);
    map_params(&CvParam::collect(Some(node), "userParam"), &mut chromatogram, precision);

    let precursor = node.child("precursor");
    map_params(
        &CvParam::collect(precursor.and_then(|p| p.child("isolationWindow")), "cvParam"),
        &mut chromatogram.precursor,
        precision,
    );
    chromatogram.precursor.fill_mz_from_isolation_window();

    map_params(
        &CvParam::collect(precursor.and_then(|p| p.child("activation")), "cvParam"),
        &mut chromatogram,
        precision,
    );

    map_params(
        &CvParam::collect(node.descend(&["product", "isolationWindow"]), "cvParam"),
        &mut chromatogram.product,
        precision,
    );
    chromatogram.product.fill_mz_from_isolation_window();

    let decoded = decode_arrays(node, id, default_length, precision);
    chromatogram.array = ChromatogramArray::from_decoded(
        decoded.time.unwrap_or_default(),
        decoded.intensity.unwrap_or_default(),
    );

    Ok(chromatogram)
}
