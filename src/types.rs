use crate::DateValue;
use crate::consts::{EPOCH_YEAR, MINUTES_PER_HOUR, SECONDS_PER_MINUTE};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;

/// A dynamically typed value handed over by the enclosing validator.
///
/// Everything the coercion engine can be asked to look at is one of these
/// variants; dispatch happens on the variant, never on runtime inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Already an instant (possibly invalid)
    Instant(DateValue),
    /// A JSON-style number
    Number(f64),
    /// A string
    Text(String),
    /// A boolean, never a date
    Bool(bool),
    /// A list, used for format arguments
    List(Vec<Self>),
    /// Absent value
    Null,
}

impl Value {
    /// Short name of the variant, used in log lines
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Instant(_) => "instant",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Bool(_) => "boolean",
            Self::List(_) => "list",
            Self::Null => "null",
        }
    }

    /// Textual form of strings and numbers, as the string matchers see them
    pub(crate) fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Instant(_) | Self::Bool(_) | Self::List(_) | Self::Null => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(d) => write!(f, "{d}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<DateValue> for Value {
    fn from(value: DateValue) -> Self {
        Self::Instant(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Instant(value.into())
    }
}

impl From<SystemTime> for Value {
    fn from(value: SystemTime) -> Self {
        Self::Instant(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Calendar and clock fields pulled out of a string by one of the matchers.
///
/// Matchers only check shape; whether the fields name a real instant is
/// decided by [`DateFields::to_date_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    pub offset_hours: i32,
    pub offset_minutes: i32,
}

impl Default for DateFields {
    fn default() -> Self {
        Self {
            year: EPOCH_YEAR,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
            offset_hours: 0,
            offset_minutes: 0,
        }
    }
}

impl DateFields {
    /// Sets a signed UTC offset; `negative` applies to both parts
    #[allow(clippy::cast_possible_wrap)]
    pub const fn with_offset(mut self, negative: bool, hours: u32, minutes: u32) -> Self {
        let sign = if negative { -1 } else { 1 };
        self.offset_hours = sign * hours as i32;
        self.offset_minutes = sign * minutes as i32;
        self
    }

    /// Composes the fields into an instant, Invalid when any field is out of range
    pub fn to_date_value(self) -> DateValue {
        if self.offset_hours.abs() >= 24 || self.offset_minutes.abs() >= MINUTES_PER_HOUR {
            return DateValue::invalid();
        }

        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day).and_then(|date| {
            date.and_hms_milli_opt(self.hour, self.minute, self.second, self.millisecond)
        });
        let Some(naive) = naive else {
            return DateValue::invalid();
        };

        let offset_ms = i64::from(self.offset_hours * MINUTES_PER_HOUR + self.offset_minutes)
            * i64::from(SECONDS_PER_MINUTE)
            * 1000;
        naive
            .and_utc()
            .timestamp_millis()
            .checked_sub(offset_ms)
            .map_or_else(DateValue::invalid, DateValue::from_millis)
    }
}
