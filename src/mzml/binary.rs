//! Binary data decoding for mzML
//!
//! mzML stores numerical arrays (m/z, intensity, time) as Base64-encoded binary
//! data, optionally compressed with zlib. This module handles the decoding pipeline:
//!
//! 1. Base64 decode the text
//! 2. Decompress if needed (zlib)
//! 3. Interpret bytes as float32 or float64 (little-endian)

use std::io::Read;

use base64::prelude::*;
use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;

/// Compression types used in mzML binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionType {
    /// No compression (raw binary)
    #[default]
    None,
    /// zlib compression (most common)
    Zlib,
}

impl CompressionType {
    /// Determine compression type from its normalized name (`"zlib"`, `"none"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "zlib" => Some(CompressionType::Zlib),
            "none" => Some(CompressionType::None),
            _ => None,
        }
    }

    /// Normalized name of this compression
    pub fn name(&self) -> &'static str {
        match self {
            CompressionType::None => "none",
            CompressionType::Zlib => "zlib",
        }
    }
}

/// Binary encoding precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryEncoding {
    /// 32-bit floating point (CV: MS:1000521)
    Float32,
    /// 64-bit floating point (CV: MS:1000523)
    #[default]
    Float64,
}

impl BinaryEncoding {
    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            BinaryEncoding::Float32 => 4,
            BinaryEncoding::Float64 => 8,
        }
    }

    /// Bit width of a single element
    pub fn bit_width(&self) -> u8 {
        match self {
            BinaryEncoding::Float32 => 32,
            BinaryEncoding::Float64 => 64,
        }
    }
}

/// Role of a decoded array within its spectrum or chromatogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayRole {
    /// m/z values
    Mz,
    /// Intensity values
    Intensity,
    /// Time values
    Time,
}

impl ArrayRole {
    /// Determine the role from its normalized name (`"mz"`, `"intensity"`, `"time"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mz" => Some(ArrayRole::Mz),
            "intensity" => Some(ArrayRole::Intensity),
            "time" => Some(ArrayRole::Time),
            _ => None,
        }
    }
}

/// Decoder settings of a single `binaryDataArray`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryArrayConfig {
    /// Element width and kind
    pub encoding: BinaryEncoding,
    /// Compression applied before base64 encoding
    pub compression: CompressionType,
    /// What the values represent
    pub role: ArrayRole,
}

/// Errors that can occur during binary decoding
#[derive(Debug, thiserror::Error)]
pub enum BinaryDecodeError {
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Decompression error: {0}")]
    DecompressionError(#[from] std::io::Error),

    #[error("Invalid data length: {actual} bytes is not a multiple of {width} bytes")]
    InvalidLength { width: usize, actual: usize },

    #[error("Missing binary array metadata: {0}")]
    MissingMetadata(&'static str),

    #[error("Unsupported binary array metadata: {0}")]
    Unsupported(String),
}

/// Decoder for mzML binary data arrays
pub struct BinaryDecoder;

impl BinaryDecoder {
    /// Decode a Base64-encoded binary array from mzML
    ///
    /// # Arguments
    /// * `base64_data` - The Base64-encoded string from the `<binary>` element
    /// * `encoding` - The numerical precision (32 or 64 bit)
    /// * `compression` - The compression type (none or zlib)
    ///
    /// # Returns
    /// A `Vec<f64>` containing the decoded values
    pub fn decode(
        base64_data: &str,
        encoding: BinaryEncoding,
        compression: CompressionType,
    ) -> Result<Vec<f64>, BinaryDecodeError> {
        let trimmed = base64_data.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        // Line-wrapped payloads are legal in XML text content
        let decoded_bytes = if trimmed.bytes().any(|b| b.is_ascii_whitespace()) {
            let compact: String = trimmed.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            BASE64_STANDARD.decode(compact)?
        } else {
            BASE64_STANDARD.decode(trimmed)?
        };

        let uncompressed = match compression {
            CompressionType::None => decoded_bytes,
            CompressionType::Zlib => {
                let mut decoder = ZlibDecoder::new(&decoded_bytes[..]);
                let mut uncompressed = Vec::new();
                decoder.read_to_end(&mut uncompressed)?;
                uncompressed
            }
        };

        Self::bytes_to_floats(&uncompressed, encoding)
    }

    /// Decode using a complete array configuration
    pub fn decode_with_config(
        base64_data: &str,
        config: &BinaryArrayConfig,
    ) -> Result<Vec<f64>, BinaryDecodeError> {
        Self::decode(base64_data, config.encoding, config.compression)
    }

    /// Convert raw bytes to f64 values based on encoding
    fn bytes_to_floats(
        bytes: &[u8],
        encoding: BinaryEncoding,
    ) -> Result<Vec<f64>, BinaryDecodeError> {
        let byte_size = encoding.byte_size();

        if bytes.len() % byte_size != 0 {
            return Err(BinaryDecodeError::InvalidLength {
                width: byte_size,
                actual: bytes.len(),
            });
        }

        let count = bytes.len() / byte_size;
        let mut values = Vec::with_capacity(count);
        let mut cursor = std::io::Cursor::new(bytes);

        match encoding {
            BinaryEncoding::Float32 => {
                for _ in 0..count {
                    let val = cursor.read_f32::<LittleEndian>()?;
                    values.push(val as f64);
                }
            }
            BinaryEncoding::Float64 => {
                for _ in 0..count {
                    let val = cursor.read_f64::<LittleEndian>()?;
                    values.push(val);
                }
            }
        }

        Ok(values)
    }
}
