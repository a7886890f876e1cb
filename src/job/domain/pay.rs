//! Currency-tagged hourly pay.

use super::{FreelancerCount, JobDomainError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code, e.g. `GBP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a validated currency code, upper-casing the input.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidCurrency`] unless the trimmed value is
    /// exactly three ASCII letters.
    pub fn new(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        let is_valid = normalized.len() == 3 && normalized.chars().all(|c| c.is_ascii_uppercase());
        if !is_valid {
            return Err(JobDomainError::InvalidCurrency(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns `GBP`, the marketplace's default currency.
    #[must_use]
    pub fn pound_sterling() -> Self {
        Self("GBP".to_owned())
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = JobDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pay per hour, per freelancer, that a client offers for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayRate {
    amount: Decimal,
    currency: CurrencyCode,
}

impl PayRate {
    /// Creates a positive pay rate.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NonPositivePayRate`] when `amount` is zero
    /// or negative.
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Result<Self, JobDomainError> {
        if amount <= Decimal::ZERO {
            return Err(JobDomainError::NonPositivePayRate(amount));
        }
        Ok(Self { amount, currency })
    }

    /// Returns the hourly amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Checks the rate against a marketplace floor and currency.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::CurrencyMismatch`] when the currencies
    /// differ, or [`JobDomainError::PayRateBelowMinimum`] when the amount is
    /// below `minimum`.
    pub fn ensure_meets(
        &self,
        minimum: Decimal,
        currency: &CurrencyCode,
    ) -> Result<(), JobDomainError> {
        if self.currency != *currency {
            return Err(JobDomainError::CurrencyMismatch {
                expected: currency.to_string(),
                found: self.currency.to_string(),
            });
        }
        if self.amount < minimum {
            return Err(JobDomainError::PayRateBelowMinimum {
                amount: self.amount,
                minimum,
            });
        }
        Ok(())
    }

    /// Returns the total cost of `hours` of work by `freelancers` people.
    #[must_use]
    pub fn total_for(&self, hours: u16, freelancers: FreelancerCount) -> Decimal {
        self.amount * Decimal::from(hours) * Decimal::from(freelancers.value())
    }
}

impl fmt::Display for PayRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
