//! Conversion of dictionary values into unsigned 64-bit integers.
//!
//! Config decoders disagree on how numbers are represented: JSON documents
//! may yield floats, YAML and TOML yield signed integers, and values coming
//! from the environment are plain text. The helpers exposed to templates
//! accept all of them through [`normalize`].

use crate::error::{Error, Result};
use crate::value::Value;

/// Converts a value into a `u64`.
///
/// * unsigned integers pass through
/// * floats are truncated toward zero
/// * signed integers are reinterpreted as unsigned (`-1` becomes `u64::MAX`)
/// * text is parsed as a base-10 unsigned integer
///
/// # Errors
/// * `Error::NumberParseError` if text is not a valid unsigned integer
/// * `Error::UnrepresentableNumber` for any other kind of value
pub fn normalize(value: &Value) -> Result<u64> {
    match value {
        Value::Unsigned(n) => Ok(*n),
        Value::Float(f) if *f >= 0.0 => Ok(*f as u64),
        Value::Float(f) => Ok(*f as i64 as u64),
        Value::Integer(i) => Ok(*i as u64),
        Value::Text(s) => s.parse::<u64>().map_err(|source| Error::NumberParseError {
            value: s.clone(),
            source,
        }),
        other => Err(Error::UnrepresentableNumber { value: other.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_truncates_toward_zero() {
        assert_eq!(normalize(&Value::Float(3.9)).unwrap(), 3);
        assert_eq!(normalize(&Value::Float(-0.5)).unwrap(), 0);
    }

    #[test]
    fn test_negative_integer_is_reinterpreted() {
        assert_eq!(normalize(&Value::Integer(-1)).unwrap(), u64::MAX);
    }
}
