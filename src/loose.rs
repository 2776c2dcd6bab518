//! Loose calendar strings, the fallback of generic coercion.
//!
//! Understands strings such as `1-1-2013 UTC`, `12/31/1999 23:59:59 GMT+0100`
//! or `Fri, 7 Jun 2013 2:21 PM -07:00`: a numeric or month-name date, an
//! optional time of day, and an optional fixed UTC offset. Without a zone
//! the string is read as UTC.

use crate::consts::{
    HOURS_PER_HALF_DAY, LOOSE_DATE_SEPARATORS, LOOSE_SHORT_YEAR_PIVOT, MIN_NAME_PREFIX,
    MONTH_NAMES, WEEKDAY_NAMES,
};
use crate::iso::{fraction_to_millis, parse_digits};
use crate::types::DateFields;

const ZONE_NAMES: [&str; 4] = ["utc", "gmt", "ut", "z"];

#[derive(Debug, Default)]
struct Parts {
    date: Option<(i32, u32, u32)>,
    month_name: Option<u32>,
    numbers: Vec<String>,
    time: Option<(u32, u32, u32, u32)>,
    meridiem: Option<bool>,
    offset: Option<(bool, u32, u32)>,
    zoned: bool,
}

/// Parses a loose calendar string into fields, `None` if any token is not understood
pub fn parse(s: &str) -> Option<DateFields> {
    let mut parts = Parts::default();

    for raw in s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let token = raw.to_ascii_lowercase();
        classify(&mut parts, &token)?;
    }

    assemble(parts)
}

fn classify(parts: &mut Parts, token: &str) -> Option<()> {
    if let Some(pm) = meridiem(token) {
        if parts.time.is_none() || parts.meridiem.is_some() {
            return None;
        }
        parts.meridiem = Some(pm);
    } else if let Some(name) = ZONE_NAMES.iter().find(|name| token.starts_with(**name)) {
        if parts.zoned {
            return None;
        }
        parts.zoned = true;
        let rest = &token[name.len()..];
        if !rest.is_empty() {
            parts.offset = Some(offset(rest)?);
        }
    } else if token.starts_with(['+', '-']) {
        if parts.offset.is_some() {
            return None;
        }
        parts.zoned = true;
        parts.offset = Some(offset(token)?);
    } else if token.contains(':') {
        if parts.time.is_some() {
            return None;
        }
        parts.time = Some(time(token)?);
    } else if token.contains(LOOSE_DATE_SEPARATORS) {
        if parts.date.is_some() {
            return None;
        }
        parts.date = Some(numeric_date(token)?);
    } else if token.bytes().all(|b| b.is_ascii_digit()) {
        parts.numbers.push(token.to_owned());
    } else {
        let word = token.trim_end_matches('.');
        if let Some(month) = name_index(word, &MONTH_NAMES) {
            if parts.month_name.is_some() {
                return None;
            }
            parts.month_name = Some(u32::try_from(month).ok()? + 1);
        } else {
            // weekday names carry no information
            name_index(word, &WEEKDAY_NAMES)?;
        }
    }
    Some(())
}

fn assemble(parts: Parts) -> Option<DateFields> {
    let (year, month, day) = match (parts.date, parts.month_name) {
        (Some(date), None) if parts.numbers.is_empty() => date,
        (None, Some(month)) => {
            let [first, second] = parts.numbers.as_slice() else {
                return None;
            };
            let (year, day) = if first.len() > 2 {
                (first, second)
            } else {
                (second, first)
            };
            (year_value(year)?, month, parse_digits(day.as_bytes())?)
        }
        _ => return None,
    };

    let mut fields = DateFields {
        year,
        month,
        day,
        ..DateFields::default()
    };

    if let Some((hour, minute, second, millisecond)) = parts.time {
        fields.hour = match parts.meridiem {
            None => hour,
            Some(_) if hour == 0 || hour > HOURS_PER_HALF_DAY => return None,
            Some(false) => hour % HOURS_PER_HALF_DAY,
            Some(true) => hour % HOURS_PER_HALF_DAY + HOURS_PER_HALF_DAY,
        };
        fields.minute = minute;
        fields.second = second;
        fields.millisecond = millisecond;
    }

    if let Some((negative, hours, minutes)) = parts.offset {
        fields = fields.with_offset(negative, hours, minutes);
    }

    Some(fields)
}

fn meridiem(token: &str) -> Option<bool> {
    match token {
        "am" | "a.m." => Some(false),
        "pm" | "p.m." => Some(true),
        _ => None,
    }
}

/// `±HH:MM`, `±HHMM` or `±HH`
fn offset(token: &str) -> Option<(bool, u32, u32)> {
    let negative = match token.as_bytes().first()? {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };
    let body = token.get(1..)?.replacen(':', "", 1);
    let bytes = body.as_bytes();
    match bytes.len() {
        2 => Some((negative, parse_digits(bytes)?, 0)),
        4 => Some((
            negative,
            parse_digits(bytes.get(..2)?)?,
            parse_digits(bytes.get(2..)?)?,
        )),
        _ => None,
    }
}

/// `H:MM`, `H:MM:SS` or `H:MM:SS.fff`
fn time(token: &str) -> Option<(u32, u32, u32, u32)> {
    let mut pieces = token.split(':');
    let hour = pieces.next().filter(|h| (1..=2).contains(&h.len()))?;
    let minute = pieces.next().filter(|m| m.len() == 2)?;
    let (second, millisecond) = match pieces.next() {
        None => (0, 0),
        Some(rest) => {
            let (whole, fraction) = rest.split_once('.').unwrap_or((rest, ""));
            if whole.len() != 2 || (rest.contains('.') && fraction.is_empty()) {
                return None;
            }
            if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (
                parse_digits(whole.as_bytes())?,
                fraction_to_millis(fraction.as_bytes()),
            )
        }
    };
    if pieces.next().is_some() {
        return None;
    }

    Some((
        parse_digits(hour.as_bytes())?,
        parse_digits(minute.as_bytes())?,
        second,
        millisecond,
    ))
}

/// `M-D-Y`, `M/D/Y`, or `Y-M-D` / `Y/M/D` when the first part has four digits
fn numeric_date(token: &str) -> Option<(i32, u32, u32)> {
    let separator = LOOSE_DATE_SEPARATORS
        .into_iter()
        .find(|sep| token.contains(*sep))?;
    let pieces: Vec<&str> = token.split(separator).collect();
    let [first, second, third] = pieces.as_slice() else {
        return None;
    };
    if pieces
        .iter()
        .any(|p| p.is_empty() || p.len() > 4 || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    if first.len() == 4 {
        Some((
            year_value(first)?,
            parse_digits(second.as_bytes())?,
            parse_digits(third.as_bytes())?,
        ))
    } else {
        Some((
            year_value(third)?,
            parse_digits(first.as_bytes())?,
            parse_digits(second.as_bytes())?,
        ))
    }
}

fn year_value(digits: &str) -> Option<i32> {
    let year = i32::try_from(parse_digits(digits.as_bytes())?).ok()?;
    if digits.len() > 2 {
        Some(year)
    } else if year < LOOSE_SHORT_YEAR_PIVOT {
        Some(2000 + year)
    } else {
        Some(1900 + year)
    }
}

/// Index of the name that `word` abbreviates, requiring at least three letters
fn name_index(word: &str, names: &[&str]) -> Option<usize> {
    if word.len() < MIN_NAME_PREFIX {
        return None;
    }
    names.iter().position(|name| name.starts_with(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(s: &str) -> Option<i64> {
        parse(s).and_then(|fields| fields.to_date_value().millis())
    }

    #[test]
    fn test_loose_cases() {
        struct TestCase {
            input: &'static str,
            expected: Option<i64>,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input: "1-1-2013 UTC",
                expected: Some(1_356_998_400_000),
                description: "month-day-year with zone",
            },
            TestCase {
                input: "1-1-1970 UTC",
                expected: Some(0),
                description: "epoch",
            },
            TestCase {
                input: "1/1/2000",
                expected: Some(946_684_800_000),
                description: "slashes without zone",
            },
            TestCase {
                input: "2013/06/07",
                expected: Some(1_370_563_200_000),
                description: "year first",
            },
            TestCase {
                input: "6/7/13 14:21:46.295 GMT",
                expected: Some(1_370_614_906_295),
                description: "two-digit year and time",
            },
            TestCase {
                input: "Jun 7 2013 2:21:46.295 PM",
                expected: Some(1_370_614_906_295),
                description: "month name and meridiem",
            },
            TestCase {
                input: "Fri, 7 June 2013 21:21:46.295 +07:00",
                expected: Some(1_370_614_906_295),
                description: "weekday, day first, offset",
            },
            TestCase {
                input: "June 7, 2013 07:21:46.295 UTC-0700",
                expected: Some(1_370_614_906_295),
                description: "zone name with offset",
            },
            TestCase {
                input: "12/31/1969 23:59:59.999 Z",
                expected: Some(-1),
                description: "just before the epoch",
            },
            TestCase {
                input: "12:00 AM 1-1-1970",
                expected: Some(0),
                description: "midnight as 12 AM",
            },
        ];

        for case in &cases {
            assert_eq!(millis(case.input), case.expected, "{}", case.description);
        }
    }

    #[test]
    fn test_rejected_shapes() {
        for input in [
            "not a valid date",
            "",
            "UTC",
            "1-1",
            "1-1-2013-4",
            "1-1/2013",
            "Jun 2013",
            "Jun 7 2013 extra",
            "1-1-2013 UTC UTC",
            "1-1-2013 13:00 PM",
            "1-1-2013 PM",
            "1-1-2013 1:2",
            "1-1-2013 +7",
            "Ju 7 2013",
        ] {
            assert!(parse(input).is_none(), "{input:?} should not parse");
        }
    }

    #[test]
    fn test_impossible_calendar_fields() {
        let fields = parse("2-30-2013").expect("shape should parse");
        assert!(!fields.to_date_value().is_valid());
    }
}
