use log::debug;
use mockable::{Clock, DefaultClock};

use crate::format::Format;
use crate::types::Value;
use crate::{Bound, DateError, DateOptions, DateValue, FormatSpec, coerce};

/// Errors raised while building a [`DateSchema`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `.format()` got something other than a string or a non-empty list of strings.
    #[error("Invalid format.")]
    InvalidFormat,

    /// A `min`/`max` source is neither `"now"` nor a valid date.
    #[error("Invalid bound: {0}")]
    InvalidBound(#[source] DateError),
}

/// A compiled date constraint.
///
/// Built once through the consuming builder methods and then used for any
/// number of independent [`validate`](Self::validate) calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSchema {
    options: DateOptions,
    min: Option<Bound>,
    max: Option<Bound>,
    format: Option<FormatSpec>,
}

/// An empty date schema: generic coercion, no bounds
pub fn date() -> DateSchema {
    DateSchema::new()
}

impl DateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the coercion policy
    #[must_use]
    pub fn options(mut self, options: DateOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the inclusive lower bound, `"now"` or anything coercible to a date.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBound` if the source is not a date.
    pub fn min(mut self, source: impl Into<Value>) -> Result<Self, ConfigError> {
        self.min = Some(Bound::from_value(&source.into()).map_err(ConfigError::InvalidBound)?);
        Ok(self)
    }

    /// Sets the inclusive upper bound, `"now"` or anything coercible to a date.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBound` if the source is not a date.
    pub fn max(mut self, source: impl Into<Value>) -> Result<Self, ConfigError> {
        self.max = Some(Bound::from_value(&source.into()).map_err(ConfigError::InvalidBound)?);
        Ok(self)
    }

    /// Accepts only ISO 8601 strings, replacing any custom formats
    #[must_use]
    pub fn iso(mut self) -> Self {
        self.format = Some(FormatSpec::Iso);
        self
    }

    /// Accepts only strings in one of the given positional formats, replacing ISO mode.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidFormat` unless `formats` is a string or a
    /// non-empty list of strings.
    pub fn format(mut self, formats: impl Into<Value>) -> Result<Self, ConfigError> {
        let compiled = match formats.into() {
            Value::Text(source) => vec![Format::new(source)],
            Value::List(items) if !items.is_empty() => items
                .into_iter()
                .map(|item| match item {
                    Value::Text(source) => Ok(Format::new(source)),
                    _ => Err(ConfigError::InvalidFormat),
                })
                .collect::<Result<_, _>>()?,
            _ => return Err(ConfigError::InvalidFormat),
        };
        self.format = Some(FormatSpec::Custom(compiled));
        Ok(self)
    }

    pub const fn date_options(&self) -> &DateOptions {
        &self.options
    }

    pub const fn min_bound(&self) -> Option<Bound> {
        self.min
    }

    pub const fn max_bound(&self) -> Option<Bound> {
        self.max
    }

    pub const fn format_spec(&self) -> Option<&FormatSpec> {
        self.format.as_ref()
    }

    /// Validates `value` against the system clock.
    ///
    /// # Errors
    /// Returns the first failing rule; see [`validate_with_clock`](Self::validate_with_clock).
    pub fn validate(&self, value: impl Into<Value>) -> Result<DateValue, DateError> {
        self.validate_with_clock(value, &DefaultClock)
    }

    /// Validates `value`, reading `"now"` bounds from `clock`.
    ///
    /// Coerces the value, rejects invalid instants, then checks `min` and
    /// `max` in that order.
    ///
    /// # Errors
    /// - any coercion error from [`coerce`]
    /// - `DateError::InvalidDate` when the value coerces to an invalid instant
    /// - `DateError::BelowMin` / `DateError::AboveMax` for bound violations
    pub fn validate_with_clock(
        &self,
        value: impl Into<Value>,
        clock: &impl Clock,
    ) -> Result<DateValue, DateError> {
        let value = value.into();
        let coerced = coerce(&value, &self.options, self.format.as_ref())?;
        let Some(millis) = coerced.millis() else {
            debug!("{value} is not a real instant");
            return Err(DateError::InvalidDate);
        };

        if let Some(min) = &self.min {
            min.check_min(millis, clock)?;
        }
        if let Some(max) = &self.max {
            max.check_max(millis, clock)?;
        }
        Ok(coerced)
    }
}
