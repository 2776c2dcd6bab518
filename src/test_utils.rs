//! Shared fixtures for unit tests.

use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;

use crate::{Format, FormatSpec};

/// A clock stuck at one instant
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp_millis(millis).expect("millis within chrono range"))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn utc(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    milli: u32,
) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, milli))
        .expect("valid test date")
        .and_utc()
}

pub fn custom(formats: &[&str]) -> FormatSpec {
    FormatSpec::Custom(formats.iter().map(|f| Format::new(*f)).collect())
}
