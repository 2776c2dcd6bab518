use std::fmt;

use log::debug;
use mockable::Clock;

use crate::consts::NOW;
use crate::types::Value;
use crate::{DateError, DateOptions, DateValue, coerce};

/// A `min` or `max` limit.
///
/// Which kind of bound a source describes is decided once, when the bound
/// is built; `Now` is only turned into an instant when it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The clock reading at validation time
    Now,
    /// A fixed instant in epoch milliseconds
    Literal(i64),
}

impl Bound {
    /// Builds a bound from `"now"` or anything generic coercion turns into a
    /// valid instant.
    ///
    /// # Errors
    /// Returns the coercion error, or `DateError::InvalidDate` when the source
    /// coerces to an invalid instant.
    pub fn from_value(source: &Value) -> Result<Self, DateError> {
        if matches!(source, Value::Text(s) if s == NOW) {
            return Ok(Self::Now);
        }
        let value = coerce(source, &DateOptions::default(), None)?;
        value.millis().map(Self::Literal).ok_or(DateError::InvalidDate)
    }

    /// Epoch milliseconds this bound stands for right now
    pub fn resolve(&self, clock: &impl Clock) -> i64 {
        match *self {
            Self::Now => clock.utc().timestamp_millis(),
            Self::Literal(ms) => ms,
        }
    }

    /// Inclusive lower bound check
    ///
    /// # Errors
    /// Returns `DateError::BelowMin` carrying the resolved limit when `millis`
    /// is earlier.
    pub fn check_min(&self, millis: i64, clock: &impl Clock) -> Result<(), DateError> {
        let limit = self.resolve(clock);
        if millis < limit {
            debug!("{millis} is below min {self} ({limit})");
            return Err(DateError::BelowMin {
                limit: DateValue::from_millis(limit),
            });
        }
        Ok(())
    }

    /// Inclusive upper bound check
    ///
    /// # Errors
    /// Returns `DateError::AboveMax` carrying the resolved limit when `millis`
    /// is later.
    pub fn check_max(&self, millis: i64, clock: &impl Clock) -> Result<(), DateError> {
        let limit = self.resolve(clock);
        if millis > limit {
            debug!("{millis} is above max {self} ({limit})");
            return Err(DateError::AboveMax {
                limit: DateValue::from_millis(limit),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Now => f.write_str(NOW),
            Self::Literal(ms) => write!(f, "{}", DateValue::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixedClock;

    #[test]
    fn test_from_value_cases() {
        struct TestCase {
            source: Value,
            expected: Result<Bound, DateError>,
            description: &'static str,
        }

        let cases = [
            TestCase {
                source: Value::from("now"),
                expected: Ok(Bound::Now),
                description: "sentinel",
            },
            TestCase {
                source: Value::from("1-1-2000 UTC"),
                expected: Ok(Bound::Literal(946_684_800_000)),
                description: "loose calendar string",
            },
            TestCase {
                source: Value::from(0),
                expected: Ok(Bound::Literal(0)),
                description: "epoch number",
            },
            TestCase {
                source: Value::from("NOW"),
                expected: Err(DateError::InvalidType),
                description: "sentinel is case sensitive",
            },
            TestCase {
                source: Value::from(true),
                expected: Err(DateError::InvalidType),
                description: "boolean",
            },
            TestCase {
                source: Value::Instant(DateValue::invalid()),
                expected: Err(DateError::InvalidDate),
                description: "invalid instant",
            },
        ];

        for case in &cases {
            assert_eq!(
                Bound::from_value(&case.source),
                case.expected,
                "{}",
                case.description
            );
        }
    }

    #[test]
    fn test_now_resolves_from_clock_each_time() {
        let bound = Bound::Now;
        assert_eq!(bound.resolve(&FixedClock::at_millis(10)), 10);
        assert_eq!(bound.resolve(&FixedClock::at_millis(20)), 20);
        assert_eq!(Bound::Literal(5).resolve(&FixedClock::at_millis(20)), 5);
    }

    #[test]
    fn test_checks_are_inclusive() {
        let clock = FixedClock::at_millis(1_000);
        let bound = Bound::Now;

        assert_eq!(bound.check_min(1_000, &clock), Ok(()));
        assert_eq!(bound.check_min(1_001, &clock), Ok(()));
        assert_eq!(
            bound.check_min(999, &clock),
            Err(DateError::BelowMin {
                limit: DateValue::from_millis(1_000),
            })
        );

        assert_eq!(bound.check_max(1_000, &clock), Ok(()));
        assert_eq!(bound.check_max(999, &clock), Ok(()));
        assert_eq!(
            bound.check_max(1_001, &clock),
            Err(DateError::AboveMax {
                limit: DateValue::from_millis(1_000),
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Bound::Now.to_string(), "now");
        assert_eq!(Bound::Literal(0).to_string(), "1970-01-01T00:00:00.000Z");
    }
}
