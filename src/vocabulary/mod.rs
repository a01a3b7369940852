//! # Vocabulary Mapping
//!
//! Normalizes PSI-MS controlled vocabulary terms into the fields of the
//! output records. The mapping is entirely table driven:
//!
//! - [`tables::TERMS`] lists each recognised term with its destination
//!   [`Field`] and, for flag-like terms, the literal value to store
//! - [`map_params`] walks a parameter list and writes each recognised term
//!   into any record implementing [`MapTarget`]
//!
//! ## Coercion
//!
//! | Kind | Fields | Stored as |
//! |------|--------|-----------|
//! | Text | vendor, serial number, type, polarity, scan type, collision type, compression, array | string |
//! | Count | ms level, charge state, dwell time | number, not rounded |
//! | Measurement | times, m/z values, offsets, energies, intensities | number, rounded to [`Precision`] |
//! | Encoding | 32/64-bit float | [`BinaryEncoding`](crate::mzml::BinaryEncoding) |
//!
//! Scan start times given in seconds are converted to minutes.

mod field;
mod mapper;
pub mod tables;

pub use field::{Field, FieldKind, MapTarget, Slot};
pub use mapper::{map_params, round_value, Precision, MAX_DECIMAL_PLACES};
pub use tables::{Literal, Term};

#[cfg(test)]
mod tests;
