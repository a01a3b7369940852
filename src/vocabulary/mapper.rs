//! The generic vocabulary mapping routine

use log::debug;

use super::field::{Field, FieldKind, MapTarget, Slot};
use super::tables::{self, Literal};
use crate::mzml::CvParam;

/// Rounding applied to measurements and decoded arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Keep full resolution
    #[default]
    Full,
    /// Round to the given number of decimal places
    Decimals(u32),
}

impl Precision {
    /// Round `value` according to this precision
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Precision::Full => value,
            Precision::Decimals(places) => round_value(value, *places),
        }
    }
}

/// Most decimal places honoured by [`round_value`]
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Round to `places` decimals (at most [`MAX_DECIMAL_PLACES`])
///
/// Rounding goes through the decimal text of the value, so exact halves
/// round to even and rounding an already rounded value is a no-op.
/// Non-finite values are returned unchanged.
pub fn round_value(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let places = places.min(MAX_DECIMAL_PLACES) as usize;
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Write recognised parameters into `target`
///
/// Parameters are visited in order. A destination that already holds a value
/// is never overwritten, so when synonymous terms occur the first one wins,
/// also across successive calls on the same target.
pub fn map_params<T>(params: &[CvParam], target: &mut T, precision: Precision)
where
    T: MapTarget + ?Sized,
{
    for param in params {
        let Some(term) = tables::lookup(param) else {
            continue;
        };

        let Some(slot) = target.slot(term.field) else {
            continue;
        };
        if slot.is_set() {
            continue;
        }

        match (term.literal, slot) {
            (Some(Literal::Encoding(encoding)), Slot::Encoding(dest)) => *dest = Some(encoding),
            (Some(Literal::Text(text)), Slot::Text(dest)) => *dest = Some(text.to_string()),
            (Some(literal), _) => {
                debug!("Literal {literal:?} does not fit {}", term.field.path());
            }
            (None, slot) => {
                let Some(raw) = param.value_str() else {
                    continue;
                };
                store(slot, term.field, raw, param, precision);
            }
        }
    }
}

fn store(slot: Slot<'_>, field: Field, raw: &str, param: &CvParam, precision: Precision) {
    match (field.kind(), slot) {
        (FieldKind::Text, Slot::Text(dest)) => *dest = Some(raw.to_string()),
        (FieldKind::Count, Slot::Integer(dest)) => match parse_number(raw) {
            Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => *dest = Some(v as i64),
            _ => debug!("Ignoring non-integer value {raw:?} for {:?}", param.key()),
        },
        (FieldKind::Count, Slot::Number(dest)) => match parse_number(raw) {
            Some(v) => *dest = Some(v),
            None => debug!("Ignoring non-numeric value {raw:?} for {:?}", param.key()),
        },
        (FieldKind::Measurement, Slot::Number(dest)) => match parse_number(raw) {
            Some(v) => {
                let v = if field == Field::ScanTime && param.unit_name.as_deref() == Some("second") {
                    v / 60.0
                } else {
                    v
                };
                *dest = Some(precision.apply(v));
            }
            None => debug!("Ignoring non-numeric value {raw:?} for {:?}", param.key()),
        },
        (kind, _) => debug!("No {kind:?} coercion for {:?}", param.key()),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
