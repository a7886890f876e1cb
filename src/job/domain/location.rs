//! Where a job takes place.

use super::JobDomainError;
use serde::{Deserialize, Serialize};

/// Address of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobLocation {
    address_line1: String,
    address_line2: Option<String>,
    postcode: String,
}

impl JobLocation {
    /// Creates a validated location. Postcodes are upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyAddress`] or
    /// [`JobDomainError::EmptyPostcode`] when the respective value is blank.
    pub fn new(
        address_line1: impl Into<String>,
        postcode: impl Into<String>,
    ) -> Result<Self, JobDomainError> {
        let line1 = address_line1.into().trim().to_owned();
        if line1.is_empty() {
            return Err(JobDomainError::EmptyAddress);
        }
        let normalized_postcode = postcode.into().trim().to_ascii_uppercase();
        if normalized_postcode.is_empty() {
            return Err(JobDomainError::EmptyPostcode);
        }
        Ok(Self {
            address_line1: line1,
            address_line2: None,
            postcode: normalized_postcode,
        })
    }

    /// Sets the optional second address line. Blank lines are dropped.
    #[must_use]
    pub fn with_address_line2(mut self, line: impl Into<String>) -> Self {
        let trimmed = line.into().trim().to_owned();
        self.address_line2 = (!trimmed.is_empty()).then_some(trimmed);
        self
    }

    /// Returns the first address line.
    #[must_use]
    pub fn address_line1(&self) -> &str {
        &self.address_line1
    }

    /// Returns the second address line, if any.
    #[must_use]
    pub fn address_line2(&self) -> Option<&str> {
        self.address_line2.as_deref()
    }

    /// Returns the postcode.
    #[must_use]
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    /// Returns the outward code of the postcode (`SW1A` for `SW1A 1AA`).
    #[must_use]
    pub fn postcode_district(&self) -> &str {
        self.postcode
            .split_whitespace()
            .next()
            .unwrap_or(&self.postcode)
    }
}
