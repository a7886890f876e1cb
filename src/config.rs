//! Marketplace booking settings.
//!
//! Settings arrive as a TOML fragment; loading it from files or the
//! environment is left to the host application.

use crate::job::domain::CurrencyCode;
use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Largest accepted timezone offset, in minutes either side of UTC.
const MAX_OFFSET_MINUTES: i32 = 23 * 60 + 59;

/// Errors raised while loading booking settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML could not be parsed into settings.
    #[error("failed to parse booking settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The job timezone offset is outside -1439..=1439 minutes.
    #[error("job timezone offset {0} minutes is out of range")]
    TimezoneOffsetOutOfRange(i32),

    /// The minimum hourly pay is negative.
    #[error("minimum pay per hour {0} must not be negative")]
    NegativeMinimumPay(Decimal),
}

/// Raw booking settings as written in TOML.
///
/// ```toml
/// job_timezone_offset_minutes = 60
/// currency = "GBP"
/// minimum_pay_per_hour = "9.50"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BookingConfig {
    /// Offset of the timezone job schedules are written in, in minutes east
    /// of UTC.
    pub job_timezone_offset_minutes: i32,
    /// Currency every pay rate must use.
    pub currency: CurrencyCode,
    /// Lowest accepted hourly pay. Any positive rate passes when zero.
    pub minimum_pay_per_hour: Decimal,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            job_timezone_offset_minutes: 0,
            currency: CurrencyCode::pound_sterling(),
            minimum_pay_per_hour: Decimal::ZERO,
        }
    }
}

impl BookingConfig {
    /// Parses and validates settings from a TOML fragment. Missing keys take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, or
    /// the validation error from [`BookingConfig::policy`].
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.policy()?;
        Ok(config)
    }

    /// Validates the settings and resolves them into a [`BookingPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TimezoneOffsetOutOfRange`] or
    /// [`ConfigError::NegativeMinimumPay`].
    pub fn policy(&self) -> Result<BookingPolicy, ConfigError> {
        let offset = self.job_timezone_offset_minutes;
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset) {
            return Err(ConfigError::TimezoneOffsetOutOfRange(offset));
        }
        let timezone = FixedOffset::east_opt(offset * 60)
            .ok_or(ConfigError::TimezoneOffsetOutOfRange(offset))?;
        if self.minimum_pay_per_hour < Decimal::ZERO {
            return Err(ConfigError::NegativeMinimumPay(self.minimum_pay_per_hour));
        }
        Ok(BookingPolicy {
            timezone,
            currency: self.currency.clone(),
            minimum_pay_per_hour: self.minimum_pay_per_hour,
        })
    }
}

/// Validated booking settings used by the lifecycle service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPolicy {
    timezone: FixedOffset,
    currency: CurrencyCode,
    minimum_pay_per_hour: Decimal,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            timezone: Utc.fix(),
            currency: CurrencyCode::pound_sterling(),
            minimum_pay_per_hour: Decimal::ZERO,
        }
    }
}

impl BookingPolicy {
    /// Returns the timezone job schedules are written in.
    #[must_use]
    pub const fn timezone(&self) -> &FixedOffset {
        &self.timezone
    }

    /// Returns the currency every pay rate must use.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Returns the lowest accepted hourly pay.
    #[must_use]
    pub const fn minimum_pay_per_hour(&self) -> Decimal {
        self.minimum_pay_per_hour
    }
}
