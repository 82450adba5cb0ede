//! Field-level parsing helpers shared by tab-delimited record types.

use crate::formats::primitives::{FormatError, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Marker used by GFF-family formats for an unset column.
pub const MISSING: &str = ".";

/// Split a line on tabs, optionally enforcing an exact field count.
///
/// # Examples
///
/// ```
/// use gffload::formats::primitives::fields::split_fields;
///
/// let fields = split_fields("chr1\t100\t200", Some(3))?;
/// assert_eq!(fields, vec!["chr1", "100", "200"]);
///
/// assert!(split_fields("chr1\t100", Some(3)).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn split_fields(line: &str, expected: Option<usize>) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();

    if let Some(expected) = expected {
        if fields.len() != expected {
            return Err(FormatError::FieldCount {
                expected,
                actual: fields.len(),
            });
        }
    }

    Ok(fields)
}

/// Parse a mandatory field.
pub fn parse_required<T>(value: &str, field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| FormatError::InvalidField {
        field: field.to_string(),
        reason: format!("'{}': {}", value, e),
    })
}

/// Parse a field that may be [`MISSING`].
pub fn parse_optional<T>(value: &str, field: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    if value == MISSING {
        Ok(None)
    } else {
        parse_required(value, field).map(Some)
    }
}
