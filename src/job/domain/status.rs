//! Job request status machine.
//!
//! The transition table is the single source of truth: every trigger names
//! the statuses it may fire from and the status it lands on. Any other
//! (status, trigger) pair is rejected.

use super::{ParseJobStatusError, ParseJobTriggerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The client has not yet paid.
    Checkout,
    /// Paid for and ready for freelancers to be booked.
    Open,
    /// Freelancers have been assigned.
    Confirmed,
    /// The work has been performed.
    Complete,
    /// The job request was called off.
    Cancelled,
}

impl JobStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Checkout,
        Self::Open,
        Self::Confirmed,
        Self::Complete,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Open => "open",
            Self::Confirmed => "confirmed",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the status reached by firing `trigger`, or `None` when the
    /// trigger is not permitted from this status.
    #[must_use]
    pub fn apply(self, trigger: JobTrigger) -> Option<Self> {
        trigger
            .source_states()
            .contains(&self)
            .then_some(trigger.target())
    }

    /// Returns the triggers that may fire from this status.
    #[must_use]
    pub fn available_triggers(self) -> Vec<JobTrigger> {
        JobTrigger::ALL
            .into_iter()
            .filter(|trigger| self.apply(*trigger).is_some())
            .collect()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "checkout" => Ok(Self::Checkout),
            "open" => Ok(Self::Open),
            "confirmed" => Ok(Self::Confirmed),
            "complete" => Ok(Self::Complete),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}

/// Named transition of the job request status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTrigger {
    /// Payment received; the job is ready for booking.
    Open,
    /// Return the job to checkout.
    BackToCheckout,
    /// All freelancers are booked.
    Confirm,
    /// The job needs freelancers again.
    Reopen,
    /// Call the job off.
    Cancel,
    /// The job has been performed.
    Complete,
}

const FROM_CHECKOUT: &[JobStatus] = &[JobStatus::Checkout];
const FROM_ANY_BUT_CHECKOUT: &[JobStatus] = &[
    JobStatus::Confirmed,
    JobStatus::Complete,
    JobStatus::Cancelled,
    JobStatus::Open,
];
const FROM_OPEN: &[JobStatus] = &[JobStatus::Open];
const FROM_SETTLED: &[JobStatus] = &[
    JobStatus::Confirmed,
    JobStatus::Complete,
    JobStatus::Cancelled,
];
const FROM_UNCONFIRMED: &[JobStatus] = &[JobStatus::Open, JobStatus::Checkout];
const FROM_CONFIRMED: &[JobStatus] = &[JobStatus::Confirmed];

impl JobTrigger {
    /// Every trigger, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::BackToCheckout,
        Self::Confirm,
        Self::Reopen,
        Self::Cancel,
        Self::Complete,
    ];

    /// Returns the trigger name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::BackToCheckout => "back_to_checkout",
            Self::Confirm => "confirm",
            Self::Reopen => "reopen",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        }
    }

    /// Returns the admin-facing action label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::BackToCheckout => "Back to checkout",
            Self::Confirm => "Confirm",
            Self::Reopen => "Reopen",
            Self::Cancel => "Cancel",
            Self::Complete => "Complete",
        }
    }

    /// Statuses from which this trigger may fire.
    #[must_use]
    pub const fn source_states(self) -> &'static [JobStatus] {
        match self {
            Self::Open => FROM_CHECKOUT,
            Self::BackToCheckout => FROM_ANY_BUT_CHECKOUT,
            Self::Confirm => FROM_OPEN,
            Self::Reopen => FROM_SETTLED,
            Self::Cancel => FROM_UNCONFIRMED,
            Self::Complete => FROM_CONFIRMED,
        }
    }

    /// Status reached when this trigger fires.
    #[must_use]
    pub const fn target(self) -> JobStatus {
        match self {
            Self::Open | Self::Reopen => JobStatus::Open,
            Self::BackToCheckout => JobStatus::Checkout,
            Self::Confirm => JobStatus::Confirmed,
            Self::Cancel => JobStatus::Cancelled,
            Self::Complete => JobStatus::Complete,
        }
    }
}

impl fmt::Display for JobTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobTrigger {
    type Error = ParseJobTriggerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "back_to_checkout" => Ok(Self::BackToCheckout),
            "confirm" => Ok(Self::Confirm),
            "reopen" => Ok(Self::Reopen),
            "cancel" => Ok(Self::Cancel),
            "complete" => Ok(Self::Complete),
            _ => Err(ParseJobTriggerError(value.to_owned())),
        }
    }
}

/// Record of one successful status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusChange {
    /// Trigger that fired.
    pub trigger: JobTrigger,
    /// Status before the transition.
    pub from: JobStatus,
    /// Status after the transition.
    pub to: JobStatus,
}
