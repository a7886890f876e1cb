//! Confirmed assignments of freelancers to job requests.

use super::{BookingId, Invitation, InvitationId};
use crate::job::domain::{FreelancerId, JobRequestId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// How a booking came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "invitation", rename_all = "snake_case")]
pub enum BookingOrigin {
    /// An admin booked the freelancer directly.
    Direct,
    /// The freelancer accepted an invitation.
    Invitation(InvitationId),
}

impl BookingOrigin {
    /// Returns the originating invitation, if any.
    #[must_use]
    pub const fn invitation(self) -> Option<InvitationId> {
        match self {
            Self::Direct => None,
            Self::Invitation(id) => Some(id),
        }
    }
}

/// Assignment of one freelancer to one job request. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    job_request: JobRequestId,
    freelancer: FreelancerId,
    origin: BookingOrigin,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBookingData {
    /// Persisted identifier.
    pub id: BookingId,
    /// Persisted job request.
    pub job_request: JobRequestId,
    /// Persisted freelancer.
    pub freelancer: FreelancerId,
    /// Persisted origin.
    pub origin: BookingOrigin,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates an admin-made booking.
    #[must_use]
    pub fn direct(job_request: JobRequestId, freelancer: FreelancerId, clock: &impl Clock) -> Self {
        Self {
            id: BookingId::new(),
            job_request,
            freelancer,
            origin: BookingOrigin::Direct,
            created_at: clock.utc(),
        }
    }

    /// Creates the booking produced by accepting `invitation`.
    #[must_use]
    pub fn from_invitation(invitation: &Invitation, clock: &impl Clock) -> Self {
        Self {
            id: BookingId::new(),
            job_request: invitation.job_request(),
            freelancer: invitation.freelancer(),
            origin: BookingOrigin::Invitation(invitation.id()),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a booking from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedBookingData) -> Self {
        Self {
            id: data.id,
            job_request: data.job_request,
            freelancer: data.freelancer,
            origin: data.origin,
            created_at: data.created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// Returns the job request.
    #[must_use]
    pub const fn job_request(&self) -> JobRequestId {
        self.job_request
    }

    /// Returns the booked freelancer.
    #[must_use]
    pub const fn freelancer(&self) -> FreelancerId {
        self.freelancer
    }

    /// Returns how the booking came about.
    #[must_use]
    pub const fn origin(&self) -> BookingOrigin {
        self.origin
    }

    /// Returns when the booking was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
