//! ISO 8601 matching.
//!
//! Accepted shapes, always as a full-string match:
//!
//! ```text
//! YYYY-MM-DD
//! YYYY-MM-DDTHH:MM(Z|±HH:MM)
//! YYYY-MM-DDTHH:MM:SS[.f+][Z|±HH:MM]
//! ```
//!
//! A space may replace the `T`. Without a zone the time is read as UTC.

use crate::consts::{FRACTION_DIGITS, ISO_SPACE_SEPARATOR, ISO_TIME_SEPARATOR, UTC_DESIGNATOR};
use crate::types::DateFields;

/// Byte cursor shared by the string matchers.
pub struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub const fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    pub const fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consumes `byte` if it is next
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes one of `bytes` if it is next and returns it
    pub fn eat_any(&mut self, bytes: &[u8]) -> Option<u8> {
        let next = self.peek().filter(|b| bytes.contains(b))?;
        self.pos += 1;
        Some(next)
    }

    /// Consumes exactly `width` ASCII digits
    pub fn digits(&mut self, width: usize) -> Option<u32> {
        let end = self.pos.checked_add(width)?;
        let slice = self.bytes.get(self.pos..end)?;
        let value = parse_digits(slice)?;
        self.pos = end;
        Some(value)
    }

    /// Consumes one or more digits and returns them as a millisecond count,
    /// keeping the first three and padding shorter runs
    pub fn fraction(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let run = self.bytes.get(start..self.pos)?;
        if run.is_empty() {
            return None;
        }
        Some(fraction_to_millis(run))
    }
}

/// Value of a run of ASCII digits, `None` if any byte is not a digit
pub fn parse_digits(slice: &[u8]) -> Option<u32> {
    slice.iter().try_fold(0u32, |acc, b| {
        b.is_ascii_digit()
            .then(|| acc.checked_mul(10)?.checked_add(u32::from(b - b'0')))
            .flatten()
    })
}

/// Milliseconds represented by the digits after a decimal point
pub fn fraction_to_millis(digits: &[u8]) -> u32 {
    (0..FRACTION_DIGITS).fold(0, |acc, i| {
        let digit = digits.get(i).map_or(0, |b| u32::from(b - b'0'));
        acc * 10 + digit
    })
}

/// Matches `s` against the ISO 8601 grammar above
pub fn parse(s: &str) -> Option<DateFields> {
    let mut scan = Scanner::new(s);
    let mut fields = date(&mut scan)?;

    if scan.is_done() {
        return Some(fields);
    }
    scan.eat_any(&[ISO_TIME_SEPARATOR, ISO_SPACE_SEPARATOR])?;

    fields.hour = scan.digits(2)?;
    if !scan.eat(b':') {
        return None;
    }
    fields.minute = scan.digits(2)?;

    let has_seconds = scan.eat(b':');
    if has_seconds {
        fields.second = scan.digits(2)?;
        if scan.eat(b'.') {
            fields.millisecond = scan.fraction()?;
        }
    }

    if scan.is_done() {
        // HH:MM alone is too short to be a time of day
        return has_seconds.then_some(fields);
    }
    fields = zone(&mut scan, fields)?;
    scan.is_done().then_some(fields)
}

fn date(scan: &mut Scanner<'_>) -> Option<DateFields> {
    let year = scan.digits(4)?;
    if !scan.eat(b'-') {
        return None;
    }
    let month = scan.digits(2)?;
    if !scan.eat(b'-') {
        return None;
    }
    let day = scan.digits(2)?;

    Some(DateFields {
        year: i32::try_from(year).ok()?,
        month,
        day,
        ..DateFields::default()
    })
}

fn zone(scan: &mut Scanner<'_>, fields: DateFields) -> Option<DateFields> {
    if scan.eat(UTC_DESIGNATOR) {
        return Some(fields);
    }
    let sign = scan.eat_any(b"+-")?;
    let hours = scan.digits(2)?;
    if !scan.eat(b':') {
        return None;
    }
    let minutes = scan.digits(2)?;
    Some(fields.with_offset(sign == b'-', hours, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(s: &str) -> Option<i64> {
        parse(s).and_then(|fields| fields.to_date_value().millis())
    }

    #[test]
    fn test_iso_grammar_cases() {
        struct TestCase {
            input: &'static str,
            is_match: bool,
        }

        let cases = [
            TestCase {
                input: "2013-06-07T14:21:46.295Z",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21:46.295Z0",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21:46.295+07:00",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21:46.295+07:000",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21:46.295-07:00",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21:46Z",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21:46Z0",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21:46+07:00",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21:46-07:00",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21Z",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21+07:00",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21+07:000",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21-07:00",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21Z+7:00",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21",
                is_match: false,
            },
            TestCase {
                input: "1-1-2013",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21:46",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07 14:21:46Z",
                is_match: true,
            },
            TestCase {
                input: "2013-06-07T14:21:46.Z",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21.5Z",
                is_match: false,
            },
            TestCase {
                input: "2013-06-07T14:21:46+0700",
                is_match: false,
            },
            TestCase {
                input: "",
                is_match: false,
            },
        ];

        for case in &cases {
            assert_eq!(
                parse(case.input).is_some(),
                case.is_match,
                "unexpected result for {:?}",
                case.input
            );
        }
    }

    #[test]
    fn test_iso_values() {
        assert_eq!(millis("2013-06-07T14:21:46.295Z"), Some(1_370_614_906_295));
        assert_eq!(millis("2013-06-07T21:21:46.295+07:00"), Some(1_370_614_906_295));
        assert_eq!(millis("2013-06-07T07:21:46.295-07:00"), Some(1_370_614_906_295));
        assert_eq!(millis("2013-06-07T14:21:46.2951234Z"), Some(1_370_614_906_295));
        assert_eq!(millis("2013-06-07T14:21:46.2Z"), Some(1_370_614_906_200));
        assert_eq!(millis("1970-01-01"), Some(0));
    }

    #[test]
    fn test_iso_shape_without_calendar_sense() {
        // shape matches, the composed instant does not exist
        let fields = parse("2013-02-30").expect("shape should match");
        assert!(!fields.to_date_value().is_valid());
        let fields = parse("2013-06-07T25:00:00Z").expect("shape should match");
        assert!(!fields.to_date_value().is_valid());
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits(b"0042"), Some(42));
        assert_eq!(parse_digits(b"4a"), None);
        assert_eq!(parse_digits(b""), Some(0));
    }
}
