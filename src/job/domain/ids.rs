//! Identifier types for job requests and the parties attached to them.

use super::JobDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest identifier representable in the `PostgreSQL` `BIGINT` columns.
const MAX_PERSISTED_ID: u64 = i64::MAX as u64;

const fn is_persistable(value: u64) -> bool {
    value != 0 && value <= MAX_PERSISTED_ID
}

/// Numeric identity of a job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRequestId(u64);

impl JobRequestId {
    /// Creates a validated job request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidJobRequestId`] when the value is zero
    /// or exceeds `i64::MAX`.
    pub const fn new(value: u64) -> Result<Self, JobDomainError> {
        if !is_persistable(value) {
            return Err(JobDomainError::InvalidJobRequestId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the human-readable reference, e.g. `JR00042`.
    #[must_use]
    pub fn reference_number(self) -> String {
        format!("JR{:05}", self.0)
    }
}

impl fmt::Display for JobRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference_number())
    }
}

/// Numeric identity of the client who placed a job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(u64);

impl ClientId {
    /// Creates a validated client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidClientId`] when the value is zero or
    /// exceeds `i64::MAX`.
    pub const fn new(value: u64) -> Result<Self, JobDomainError> {
        if !is_persistable(value) {
            return Err(JobDomainError::InvalidClientId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric identity of a freelancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreelancerId(u64);

impl FreelancerId {
    /// Creates a validated freelancer identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidFreelancerId`] when the value is zero
    /// or exceeds `i64::MAX`.
    pub const fn new(value: u64) -> Result<Self, JobDomainError> {
        if !is_persistable(value) {
            return Err(JobDomainError::InvalidFreelancerId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the human-readable reference, e.g. `FR0000042`.
    #[must_use]
    pub fn reference_number(self) -> String {
        format!("FR{:07}", self.0)
    }
}

impl fmt::Display for FreelancerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference_number())
    }
}
