use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::format::{self, Format};
use crate::prelude::*;
use crate::types::{DateFields, Value};
use crate::{DateError, DateValue, iso, loose};

/// Coercion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateOptions {
    /// When false only native instants are accepted
    pub convert: bool,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self { convert: true }
    }
}

/// How date strings are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum FormatSpec {
    /// ISO 8601 only
    #[display(fmt = "ISO 8601")]
    Iso,
    /// Positional formats, tried in order
    #[display(fmt = "{}", "format_list(_0)")]
    Custom(Vec<Format>),
}

fn format_list(formats: &[Format]) -> String {
    formats
        .iter()
        .map(Format::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turns `value` into a [`DateValue`] under `options` and the optional format.
///
/// Native instants are returned as they are, even when invalid; the caller
/// decides what an invalid instant means. Every other failure is an error.
///
/// # Errors
/// - `DateError::InvalidType` for booleans, lists, null, any non-instant when
///   `convert` is off, or a string generic mode cannot read
/// - `DateError::InvalidIso` when ISO mode is active and the string does not match
/// - `DateError::InvalidFormat` when none of the custom formats match
pub fn coerce(
    value: &Value,
    options: &DateOptions,
    spec: Option<&FormatSpec>,
) -> Result<DateValue, DateError> {
    if let Value::Instant(instant) = value {
        return Ok(*instant);
    }
    if !options.convert {
        debug!("rejecting {} with conversion disabled", value.kind());
        return Err(DateError::InvalidType);
    }

    let Some(text) = value.as_text() else {
        debug!("rejecting {} as a date", value.kind());
        return Err(DateError::InvalidType);
    };

    match spec {
        Some(FormatSpec::Iso) => {
            trace!("matching {text:?} as ISO 8601");
            iso::parse(&text)
                .map(DateFields::to_date_value)
                .ok_or(DateError::InvalidIso)
        }
        Some(FormatSpec::Custom(formats)) => {
            trace!("matching {text:?} against {} formats", formats.len());
            format::match_fields(formats, &text)
                .map(DateFields::to_date_value)
                .ok_or_else(|| DateError::InvalidFormat {
                    formats: formats.iter().map(ToString::to_string).collect(),
                })
        }
        None => match value {
            Value::Number(n) => {
                trace!("reading number {n} as epoch milliseconds");
                Ok(DateValue::from_f64(*n))
            }
            _ => parse_generic(&text).ok_or(DateError::InvalidType),
        },
    }
}

/// Generic string reading: integers are epoch milliseconds, then ISO 8601,
/// then loose calendar strings
pub fn parse_generic(s: &str) -> Option<DateValue> {
    if is_integer(s) {
        trace!("reading {s:?} as epoch milliseconds");
        // out of i64 range is still an integer, just not an instant
        return Some(
            s.parse::<i64>()
                .map_or_else(|_| DateValue::invalid(), DateValue::from_millis),
        );
    }

    let fields = iso::parse(s).or_else(|| loose::parse(s));
    if fields.is_none() {
        debug!("no date reading for {s:?}");
    }
    fields.map(DateFields::to_date_value)
}

/// `^[+-]?[0-9]+$`
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
