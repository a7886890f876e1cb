//! Invitations offered to freelancers.

use super::{BookingDomainError, InvitationId, ParseInvitationStatusError};
use crate::job::domain::{FreelancerId, JobRequestId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting the freelancer's answer.
    Pending,
    /// Accepted; a booking was created.
    Accepted,
    /// Declined by the freelancer.
    Declined,
}

impl InvitationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Returns whether the invitation still awaits an answer.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvitationStatus {
    type Error = ParseInvitationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseInvitationStatusError(value.to_owned())),
        }
    }
}

/// Offer for one freelancer to work one job request.
///
/// Once accepted or declined an invitation never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    job_request: JobRequestId,
    freelancer: FreelancerId,
    status: InvitationStatus,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInvitationData {
    /// Persisted identifier.
    pub id: InvitationId,
    /// Persisted job request.
    pub job_request: JobRequestId,
    /// Persisted freelancer.
    pub freelancer: FreelancerId,
    /// Persisted status.
    pub status: InvitationStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted resolution timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Creates a pending invitation.
    #[must_use]
    pub fn new(job_request: JobRequestId, freelancer: FreelancerId, clock: &impl Clock) -> Self {
        Self {
            id: InvitationId::new(),
            job_request,
            freelancer,
            status: InvitationStatus::Pending,
            created_at: clock.utc(),
            resolved_at: None,
        }
    }

    /// Reconstructs an invitation from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedInvitationData) -> Self {
        Self {
            id: data.id,
            job_request: data.job_request,
            freelancer: data.freelancer,
            status: data.status,
            created_at: data.created_at,
            resolved_at: data.resolved_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the job request.
    #[must_use]
    pub const fn job_request(&self) -> JobRequestId {
        self.job_request
    }

    /// Returns the invited freelancer.
    #[must_use]
    pub const fn freelancer(&self) -> FreelancerId {
        self.freelancer
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Returns when the invitation was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the invitation was answered, if it has been.
    #[must_use]
    pub const fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Fails with [`BookingDomainError::NotInvited`] unless `freelancer` is
    /// the invitee.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::NotInvited`] for any other freelancer.
    pub fn ensure_addressed_to(&self, freelancer: FreelancerId) -> Result<(), BookingDomainError> {
        if self.freelancer != freelancer {
            return Err(BookingDomainError::NotInvited {
                invitation: self.id,
                freelancer,
            });
        }
        Ok(())
    }

    /// Fails with [`BookingDomainError::InvitationResolved`] once answered.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::InvitationResolved`] when the invitation
    /// is no longer pending.
    pub const fn ensure_pending(&self) -> Result<(), BookingDomainError> {
        if !self.status.is_pending() {
            return Err(BookingDomainError::InvitationResolved {
                invitation: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    pub(crate) fn resolve(
        &mut self,
        status: InvitationStatus,
        at: DateTime<Utc>,
    ) -> Result<(), BookingDomainError> {
        self.ensure_pending()?;
        self.status = status;
        self.resolved_at = Some(at);
        Ok(())
    }
}
