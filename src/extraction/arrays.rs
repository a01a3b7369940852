//! Decoding of a record's `binaryDataArrayList`

use log::{debug, warn};

use super::models::BinaryArrayParams;
use crate::mzml::{
    ArrayRole, BinaryArrayConfig, BinaryDecodeError, BinaryDecoder, CompressionType, CvParam,
    MzMLNode,
};
use crate::vocabulary::{map_params, Precision};

impl BinaryArrayParams {
    /// Read the decoder settings of one `binaryDataArray`
    pub fn from_node(node: &MzMLNode) -> Self {
        let mut params = Self::default();
        map_params(&CvParam::collect(Some(node), "cvParam"), &mut params, Precision::Full);
        params
    }

    /// Complete decoder configuration, or why the array cannot be decoded
    pub fn config(&self) -> Result<BinaryArrayConfig, BinaryDecodeError> {
        let encoding = self
            .encoding
            .ok_or(BinaryDecodeError::MissingMetadata("binary data type"))?;
        let compression = self
            .compression
            .as_deref()
            .ok_or(BinaryDecodeError::MissingMetadata("compression"))?;
        let compression = CompressionType::from_name(compression)
            .ok_or_else(|| BinaryDecodeError::Unsupported(compression.to_string()))?;
        let array = self
            .array
            .as_deref()
            .ok_or(BinaryDecodeError::MissingMetadata("array type"))?;
        let role = ArrayRole::from_name(array)
            .ok_or_else(|| BinaryDecodeError::Unsupported(array.to_string()))?;

        Ok(BinaryArrayConfig {
            encoding,
            compression,
            role,
        })
    }
}

/// Arrays decoded from one spectrum or chromatogram
#[derive(Debug, Default)]
pub(crate) struct DecodedArrays {
    pub mz: Option<Vec<f64>>,
    pub intensity: Option<Vec<f64>>,
    pub time: Option<Vec<f64>>,
}

/// Decode every supported array below `record`
///
/// Arrays that cannot be decoded are skipped. Values are rounded to
/// `precision`; a later array with the same role replaces an earlier one.
pub(crate) fn decode_arrays(
    record: &MzMLNode,
    record_id: &str,
    default_length: Option<usize>,
    precision: Precision,
) -> DecodedArrays {
    let mut decoded = DecodedArrays::default();
    let Some(list) = record.child("binaryDataArrayList") else {
        return decoded;
    };

    for array_node in list.children_named("binaryDataArray") {
        let config = match BinaryArrayParams::from_node(array_node).config() {
            Ok(config) => config,
            Err(e) => {
                debug!("Skipping binary array of {record_id}: {e}");
                continue;
            }
        };

        let text = array_node.child("binary").map_or("", |b| b.text.as_str());
        let mut values = match BinaryDecoder::decode_with_config(text, &config) {
            Ok(values) => values,
            Err(e) => {
                warn!("Skipping {:?} array of {record_id}: {e}", config.role);
                continue;
            }
        };

        if let Some(expected) = default_length {
            if values.len() != expected {
                warn!(
                    "{:?} array of {record_id} has {} values, expected {expected}",
                    config.role,
                    values.len()
                );
            }
        }

        if precision != Precision::Full {
            for v in values.iter_mut() {
                *v = precision.apply(*v);
            }
        }

        match config.role {
            ArrayRole::Mz => decoded.mz = Some(values),
            ArrayRole::Intensity => decoded.intensity = Some(values),
            ArrayRole::Time => decoded.time = Some(values),
        }
    }

    decoded
}
