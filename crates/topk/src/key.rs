//! Composite key codec.
//!
//! A composite key packs every label value of one observation into a single
//! string: each value in schema order, each followed by the reserved
//! separator. A schema of `n` labels therefore always yields exactly `n`
//! separator occurrences, no matter how many of the values were curried in
//! advance. That invariant is what lets the collection path decode a key
//! without knowing its curry history.

use crate::error::{Result, TopKError};

/// Reserved field separator (ASCII unit separator).
///
/// Label values must not contain this character. The contract is not
/// validated on the observation path; a violation surfaces as a field-count
/// mismatch from [`decode`] when the key is next collected.
pub(crate) const SEPARATOR: char = '\u{1f}';

/// Joins label values into one composite key, one trailing separator per
/// value.
pub(crate) fn encode<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut key = String::new();
    for value in values {
        key.push_str(value);
        key.push(SEPARATOR);
    }
    key
}

/// Splits a composite key back into its `expected` label values.
///
/// The final separator leaves one trailing empty field behind, so a
/// well-formed key splits into exactly `expected + 1` parts. Any other count
/// means a label value contained [`SEPARATOR`] or the key was corrupted.
pub(crate) fn decode(key: &str, expected: usize) -> Result<Vec<String>> {
    let fields: Vec<&str> = key.split(SEPARATOR).collect();
    if fields.len() != expected + 1 {
        return Err(TopKError::KeyFieldMismatch {
            expected,
            actual: fields.len().saturating_sub(1),
        });
    }
    Ok(fields[..expected].iter().map(|field| (*field).to_string()).collect())
}

#[cfg(test)]
mod tests {
    //! Unit tests for the composite key codec.
    use super::*;

    /// Validates `encode` behavior for the separator-per-field scenario.
    ///
    /// Assertions:
    /// - Confirms the encoded key carries one separator per value, including
    ///   a trailing one.
    #[test]
    fn encode_appends_one_separator_per_value() {
        let key = encode(["get", "/index"]);
        assert_eq!(key, format!("get{SEPARATOR}/index{SEPARATOR}"));
        assert_eq!(key.matches(SEPARATOR).count(), 2);
    }

    #[test]
    fn encode_empty_schema_is_empty_key() {
        let no_values: [&str; 0] = [];
        assert_eq!(encode(no_values), "");
    }

    /// Validates `decode` behavior for the exact round trip scenario.
    ///
    /// Assertions:
    /// - Confirms decoding restores the original values in order.
    /// - Confirms empty values survive the round trip.
    #[test]
    fn round_trip_restores_values_in_order() {
        let values = ["us-east", "", "/healthz"];
        let decoded = decode(&encode(values), values.len()).unwrap();
        assert_eq!(decoded, vec!["us-east".to_string(), String::new(), "/healthz".to_string()]);
    }

    #[test]
    fn decode_rejects_wrong_field_count() {
        let key = encode(["a", "b"]);
        let err = decode(&key, 3).unwrap_err();
        assert!(matches!(
            err,
            crate::error::TopKError::KeyFieldMismatch { expected: 3, actual: 2 }
        ));
    }

    /// Validates `decode` behavior for the separator collision scenario.
    ///
    /// A label value containing the reserved separator inflates the field
    /// count, which must be reported as a mismatch rather than decoded into
    /// misaligned values.
    #[test]
    fn decode_detects_separator_inside_value() {
        let key = encode([format!("bad{SEPARATOR}value").as_str()]);
        let err = decode(&key, 1).unwrap_err();
        assert!(matches!(
            err,
            crate::error::TopKError::KeyFieldMismatch { expected: 1, actual: 2 }
        ));
    }

    #[test]
    fn decode_empty_key_for_empty_schema() {
        assert_eq!(decode("", 0).unwrap(), Vec::<String>::new());
    }
}
