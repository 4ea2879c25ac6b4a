//! Conversion of string-typed form fields into numbers.
//!
//! Every helper takes the field name so a rejection can point at the input
//! the user has to fix. An absent or empty field is never an error here; it
//! comes back as `None` and the caller decides whether that means "omit",
//! "zero" or "missing".

use crate::error::{ValidationError, ValidationReason};

type Coerced<T> = std::result::Result<Option<T>, ValidationError>;

/// Trimmed field contents, or `None` for absent/blank input
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse any finite number
pub fn coerce_number(field: &'static str, raw: Option<&str>) -> Coerced<f64> {
    let Some(text) = non_empty(raw) else {
        return Ok(None);
    };

    let value: f64 = text
        .parse()
        .map_err(|_| ValidationError::new(field, ValidationReason::NotNumeric(text.to_string())))?;

    if !value.is_finite() {
        return Err(ValidationError::new(field, ValidationReason::NotFinite));
    }

    Ok(Some(value))
}

/// Parse a finite number that is zero or more
pub fn coerce_non_negative(field: &'static str, raw: Option<&str>) -> Coerced<f64> {
    match coerce_number(field, raw)? {
        Some(v) if v < 0.0 => Err(ValidationError::new(field, ValidationReason::Negative)),
        // -0.0 parses fine but should not leak into records
        Some(v) => Ok(Some(v.abs())),
        None => Ok(None),
    }
}

/// Parse a finite number strictly greater than zero
pub fn coerce_positive(field: &'static str, raw: Option<&str>) -> Coerced<f64> {
    match coerce_number(field, raw)? {
        Some(v) if v <= 0.0 => Err(ValidationError::new(field, ValidationReason::NotPositive)),
        other => Ok(other),
    }
}

/// Parse a whole, non-negative count such as sets or reps
///
/// `"3"` and `"3.0"` both give 3; `"3.5"` is rejected.
pub fn coerce_count(field: &'static str, raw: Option<&str>) -> Coerced<u32> {
    match coerce_non_negative(field, raw)? {
        Some(v) if v.fract() != 0.0 => Err(ValidationError::new(field, ValidationReason::NotWhole)),
        Some(v) if v > f64::from(u32::MAX) => Err(ValidationError::new(
            field,
            ValidationReason::TooLarge {
                max: u64::from(u32::MAX),
            },
        )),
        Some(v) => Ok(Some(v as u32)),
        None => Ok(None),
    }
}
