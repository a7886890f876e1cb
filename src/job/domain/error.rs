//! Error types for job request domain validation and parsing.

use super::{JobRequestId, JobStatus, JobTrigger};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned while constructing or mutating job request values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The job request identifier is zero or too large to persist.
    #[error("invalid job request id {0}, expected a positive integer")]
    InvalidJobRequestId(u64),

    /// The client identifier is zero or too large to persist.
    #[error("invalid client id {0}, expected a positive integer")]
    InvalidClientId(u64),

    /// The freelancer identifier is zero or too large to persist.
    #[error("invalid freelancer id {0}, expected a positive integer")]
    InvalidFreelancerId(u64),

    /// The requested number of freelancers is outside 1..=9.
    #[error("invalid number of freelancers {0}, expected 1 to 9")]
    InvalidFreelancerCount(u8),

    /// The minimum years of experience is not one of 0, 1, 3 or 5.
    #[error("invalid years of experience {0}, expected 0, 1, 3 or 5")]
    InvalidYearsExperience(u16),

    /// The job duration is zero hours.
    #[error("job duration must be at least one hour")]
    InvalidDuration,

    /// The scheduled start does not exist in the job's local timezone.
    #[error("start time {time} on {date} does not exist in the job timezone")]
    NonexistentLocalTime {
        /// Scheduled date.
        date: NaiveDate,
        /// Scheduled start time.
        time: NaiveTime,
    },

    /// The pay rate is zero or negative.
    #[error("pay per hour must be positive, got {0}")]
    NonPositivePayRate(Decimal),

    /// The pay rate is below the configured minimum.
    #[error("pay per hour {amount} is below the minimum of {minimum}")]
    PayRateBelowMinimum {
        /// Offered amount.
        amount: Decimal,
        /// Configured minimum.
        minimum: Decimal,
    },

    /// The currency code is not three upper-case ASCII letters.
    #[error("invalid currency code '{0}', expected an ISO 4217 code")]
    InvalidCurrency(String),

    /// The pay rate currency differs from the marketplace currency.
    #[error("pay rate currency {found} does not match marketplace currency {expected}")]
    CurrencyMismatch {
        /// Configured marketplace currency.
        expected: String,
        /// Currency of the offered rate.
        found: String,
    },

    /// The first address line is empty after trimming.
    #[error("address line 1 must not be empty")]
    EmptyAddress,

    /// The postcode is empty after trimming.
    #[error("postcode must not be empty")]
    EmptyPostcode,

    /// The trigger is not permitted from the job request's current status.
    #[error("cannot {trigger} job request {job_request} while it is {from}")]
    InvalidTransition {
        /// Job request the trigger was fired on.
        job_request: JobRequestId,
        /// Rejected trigger.
        trigger: JobTrigger,
        /// Status at the time of the attempt.
        from: JobStatus,
    },
}

/// Error returned while parsing job statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

/// Error returned while parsing a transition trigger name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job trigger: {0}")]
pub struct ParseJobTriggerError(pub String);

/// Error returned while parsing a phone requirement from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown phone requirement: {0}")]
pub struct ParsePhoneRequirementError(pub String);
