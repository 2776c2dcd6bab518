//! Date coercion and bound checking for schema validators.
//!
//! A [`DateSchema`] is compiled once and then validates any number of
//! [`Value`]s, turning native instants, epoch milliseconds, ISO 8601 strings,
//! custom positional formats, or loose calendar strings into a [`DateValue`],
//! and enforcing inclusive `min`/`max` bounds where `"now"` is read from the
//! clock on every call.
//!
//! ```
//! use datebound::{DateError, date};
//!
//! let schema = date().min("1-1-2000 UTC")?.iso();
//! assert!(schema.validate("2013-06-07T14:21:46.295Z").is_ok());
//! assert!(matches!(schema.validate("1-1-2013"), Err(DateError::InvalidIso)));
//! # Ok::<(), datebound::ConfigError>(())
//! ```

mod bound;
mod coerce;
mod consts;
mod format;
mod iso;
mod loose;
mod prelude;
mod schema;
#[cfg(test)]
mod test_utils;
mod types;

pub use bound::Bound;
pub use coerce::{DateOptions, FormatSpec, coerce};
pub use consts::*;
pub use format::{Format, Token, match_formats};
pub use schema::{ConfigError, DateSchema, date};
pub use types::Value;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use mockable::Clock;
use std::fmt;
use std::time::SystemTime;

/// An instant in milliseconds since the Unix epoch, or an explicit invalid marker.
///
/// Every construction path that cannot produce a real time point yields the
/// invalid value instead of failing, so a `DateValue` can always be passed
/// around and rejected later. Valid values stay within [`MAX_TIME_MS`] of the
/// epoch and always convert to a [`DateTime<Utc>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateValue {
    millis: Option<i64>,
}

/// Reasons a value fails date validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Neither an instant nor something the active coercion mode accepts.
    #[error("value must be a number of milliseconds or valid date string")]
    InvalidType,

    /// ISO mode is active and the string does not follow ISO 8601.
    #[error("value must be a valid ISO 8601 date")]
    InvalidIso,

    /// None of the custom formats matched.
    #[error("value must be a string with one of the following formats {}", .formats.join(", "))]
    InvalidFormat { formats: Vec<String> },

    /// The value parsed but names no real point in time.
    #[error("value must be a valid date")]
    InvalidDate,

    /// Earlier than the resolved minimum.
    #[error("value must be larger than or equal to \"{limit}\"")]
    BelowMin { limit: DateValue },

    /// Later than the resolved maximum.
    #[error("value must be less than or equal to \"{limit}\"")]
    AboveMax { limit: DateValue },
}

impl DateValue {
    /// The invalid instant
    pub const fn invalid() -> Self {
        Self { millis: None }
    }

    /// Instant at `millis` after the epoch; invalid outside the supported range
    pub fn from_millis(millis: i64) -> Self {
        if millis.checked_abs().is_none_or(|abs| abs > MAX_TIME_MS)
            || DateTime::<Utc>::from_timestamp_millis(millis).is_none()
        {
            return Self::invalid();
        }
        Self {
            millis: Some(millis),
        }
    }

    /// Instant from a floating point millisecond count, dropping the fraction.
    /// NaN and infinities are invalid.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_f64(millis: f64) -> Self {
        if !millis.is_finite() {
            return Self::invalid();
        }
        let truncated = millis.trunc();
        if truncated.abs() > MAX_TIME_MS as f64 {
            return Self::invalid();
        }
        Self::from_millis(truncated as i64)
    }

    /// Parses a string the way generic coercion does: epoch milliseconds,
    /// ISO 8601, then loose calendar strings. Unparsable input is invalid.
    pub fn parse(s: &str) -> Self {
        coerce::parse_generic(s).unwrap_or_else(Self::invalid)
    }

    /// Current instant according to `clock`
    pub fn now(clock: &impl Clock) -> Self {
        clock.utc().into()
    }

    /// Whether this is a real point in time
    pub const fn is_valid(&self) -> bool {
        self.millis.is_some()
    }

    /// Milliseconds since the epoch, `None` when invalid
    pub const fn millis(&self) -> Option<i64> {
        self.millis
    }

    /// The instant as a UTC date-time, `None` when invalid
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        self.millis.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Epoch milliseconds as a decimal string, `NaN` when invalid
    pub fn to_epoch_string(self) -> String {
        self.millis
            .map_or_else(|| "NaN".to_owned(), |ms| ms.to_string())
    }
}

impl Default for DateValue {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => f.write_str("Invalid Date"),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateValue {
    fn from(value: DateTime<Tz>) -> Self {
        Self::from_millis(value.timestamp_millis())
    }
}

impl From<SystemTime> for DateValue {
    fn from(value: SystemTime) -> Self {
        DateTime::<Utc>::from(value).into()
    }
}

impl TryFrom<DateValue> for DateTime<Utc> {
    type Error = DateError;

    fn try_from(value: DateValue) -> Result<Self, Self::Error> {
        value.to_datetime().ok_or(DateError::InvalidDate)
    }
}

impl serde::Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        let value = Self::parse(&s);
        if value.is_valid() {
            Ok(value)
        } else {
            Err(serde::de::Error::custom(DateError::InvalidDate))
        }
    }
}
