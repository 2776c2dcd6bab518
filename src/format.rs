//! Positional date formats such as `DD#YYYY$MM`.
//!
//! A format is a sequence of fixed-width field tokens and literal
//! characters. A string matches when every literal sits at its position,
//! every token position holds the right number of digits, and nothing is
//! left over.

use std::convert::Infallible;
use std::str::FromStr;

use crate::consts::SHORT_YEAR_PIVOT;
use crate::prelude::*;
use crate::types::DateFields;

/// One element of a compiled format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Token {
    /// Four-digit year
    #[display(fmt = "YYYY")]
    Year,
    /// Two-digit year, 69-99 in the 1900s and 00-68 in the 2000s
    #[display(fmt = "YY")]
    ShortYear,
    #[display(fmt = "MM")]
    Month,
    #[display(fmt = "DD")]
    Day,
    /// Hour of day, 24-hour clock
    #[display(fmt = "HH")]
    Hour,
    #[display(fmt = "mm")]
    Minute,
    #[display(fmt = "ss")]
    Second,
    /// Tenths of a second
    #[display(fmt = "S")]
    Tenths,
    /// Hundredths of a second
    #[display(fmt = "SS")]
    Hundredths,
    #[display(fmt = "SSS")]
    Millis,
    /// UTC offset as `±HH:MM`
    #[display(fmt = "Z")]
    Offset,
    /// UTC offset as `±HHMM`
    #[display(fmt = "ZZ")]
    CompactOffset,
    /// Any other character, matched verbatim
    #[display(fmt = "{_0}")]
    Literal(char),
}

/// Token spellings, longest first so `YYYY` wins over `YY`
const PATTERNS: [(&str, Token); 12] = [
    ("YYYY", Token::Year),
    ("YY", Token::ShortYear),
    ("MM", Token::Month),
    ("DD", Token::Day),
    ("HH", Token::Hour),
    ("mm", Token::Minute),
    ("ss", Token::Second),
    ("SSS", Token::Millis),
    ("SS", Token::Hundredths),
    ("S", Token::Tenths),
    ("ZZ", Token::CompactOffset),
    ("Z", Token::Offset),
];

impl Token {
    /// Number of characters this token consumes
    pub const fn width(self) -> usize {
        match self {
            Self::Year => 4,
            Self::Offset => 6,
            Self::CompactOffset => 5,
            Self::Millis => 3,
            Self::Tenths | Self::Literal(_) => 1,
            Self::ShortYear
            | Self::Month
            | Self::Day
            | Self::Hour
            | Self::Minute
            | Self::Second
            | Self::Hundredths => 2,
        }
    }
}

/// A compiled positional format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{source}")]
pub struct Format {
    source: String,
    tokens: Vec<Token>,
}

impl Format {
    /// Compiles a format string. Every string is a valid format; characters
    /// that are not part of a token are literals.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut tokens = Vec::new();
        let mut rest = source.as_str();

        while let Some(c) = rest.chars().next() {
            if let Some((pattern, token)) = PATTERNS.iter().find(|(p, _)| rest.starts_with(p)) {
                tokens.push(*token);
                rest = &rest[pattern.len()..];
            } else {
                tokens.push(Token::Literal(c));
                rest = &rest[c.len_utf8()..];
            }
        }

        Self { source, tokens }
    }

    /// The format as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Length in characters of every string this format accepts
    pub fn width(&self) -> usize {
        self.tokens.iter().map(|t| t.width()).sum()
    }

    /// Whether `s` has exactly the shape of this format
    pub fn matches(&self, s: &str) -> bool {
        self.parse_fields(s).is_some()
    }

    /// Extracts date fields when `s` has exactly the shape of this format.
    /// Calendar ranges are not checked here.
    pub(crate) fn parse_fields(&self, s: &str) -> Option<DateFields> {
        let mut chars = s.chars();
        let mut fields = DateFields::default();

        for token in &self.tokens {
            match *token {
                Token::Literal(expected) => {
                    if chars.next()? != expected {
                        return None;
                    }
                }
                Token::Offset | Token::CompactOffset => {
                    let negative = match chars.next()? {
                        '+' => false,
                        '-' => true,
                        _ => return None,
                    };
                    let hours = take_digits(&mut chars, 2)?;
                    if *token == Token::Offset && chars.next()? != ':' {
                        return None;
                    }
                    let minutes = take_digits(&mut chars, 2)?;
                    fields = fields.with_offset(negative, hours, minutes);
                }
                field => {
                    let value = take_digits(&mut chars, field.width())?;
                    apply(&mut fields, field, value)?;
                }
            }
        }

        chars.next().is_none().then_some(fields)
    }
}

impl FromStr for Format {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Returns the fields of the first format that `s` matches, trying them in order
pub fn match_fields(formats: &[Format], s: &str) -> Option<DateFields> {
    formats.iter().find_map(|format| format.parse_fields(s))
}

/// Returns the first format in `formats` that `s` matches
pub fn match_formats<'a>(formats: &'a [Format], s: &str) -> Option<&'a Format> {
    formats.iter().find(|format| format.matches(s))
}

fn take_digits(chars: &mut std::str::Chars<'_>, width: usize) -> Option<u32> {
    (0..width).try_fold(0u32, |acc, _| {
        let digit = chars.next()?.to_digit(10)?;
        Some(acc * 10 + digit)
    })
}

fn apply(fields: &mut DateFields, token: Token, value: u32) -> Option<()> {
    match token {
        Token::Year => fields.year = i32::try_from(value).ok()?,
        Token::ShortYear => {
            let short = i32::try_from(value).ok()?;
            fields.year = if short < SHORT_YEAR_PIVOT {
                2000 + short
            } else {
                1900 + short
            };
        }
        Token::Month => fields.month = value,
        Token::Day => fields.day = value,
        Token::Hour => fields.hour = value,
        Token::Minute => fields.minute = value,
        Token::Second => fields.second = value,
        Token::Tenths => fields.millisecond = value * 100,
        Token::Hundredths => fields.millisecond = value * 10,
        Token::Millis => fields.millisecond = value,
        Token::Offset | Token::CompactOffset | Token::Literal(_) => return None,
    }
    Some(())
}
