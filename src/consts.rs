/// Largest distance from the epoch, in milliseconds, that a valid instant may have
/// (100,000,000 days either side of 1970-01-01)
pub const MAX_TIME_MS: i64 = 8_640_000_000_000_000;

/// Bound source that resolves to the current time on every validation
pub const NOW: &str = "now";

/// Separator between date and time-of-day in ISO 8601 strings
pub const ISO_TIME_SEPARATOR: u8 = b'T';
/// Alternate date/time separator accepted by the ISO matcher
pub const ISO_SPACE_SEPARATOR: u8 = b' ';
/// UTC designator
pub const UTC_DESIGNATOR: u8 = b'Z';

/// Separators accepted between numeric date parts in loose strings
pub const LOOSE_DATE_SEPARATORS: [char; 2] = ['-', '/'];

/// Two-digit years below this pivot land in the 2000s for `YY` format tokens
pub(crate) const SHORT_YEAR_PIVOT: i32 = 69;
/// Two-digit years below this pivot land in the 2000s for loose strings
pub(crate) const LOOSE_SHORT_YEAR_PIVOT: i32 = 50;

/// Epoch year, used when a format carries no year token
pub(crate) const EPOCH_YEAR: i32 = 1970;

pub(crate) const MINUTES_PER_HOUR: i32 = 60;
pub(crate) const SECONDS_PER_MINUTE: i32 = 60;
pub(crate) const HOURS_PER_HALF_DAY: u32 = 12;

/// Milliseconds use three fractional digits
pub(crate) const FRACTION_DIGITS: usize = 3;

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// English weekday names, Monday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Shortest accepted abbreviation of a month or weekday name
pub(crate) const MIN_NAME_PREFIX: usize = 3;
