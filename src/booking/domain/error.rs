//! Errors raised by the invitation and booking rules.

use super::{InvitationId, InvitationStatus};
use crate::job::domain::{FreelancerCount, FreelancerId, JobRequestId};
use std::fmt;
use thiserror::Error;

/// Kind of record that blocks a new invitation or booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// An invitation for the pair exists.
    Invitation,
    /// A booking for the pair exists.
    Booking,
}

impl RequestKind {
    /// Returns the lowercase record name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invitation => "invitation",
            Self::Booking => "booking",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business-rule rejections for invitations and bookings.
///
/// Every variant is an expected, recoverable condition meant for display to
/// the person who triggered it; see [`BookingDomainError::user_message`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingDomainError {
    /// An invitation or booking already exists for the pair.
    #[error("{kind} already exists for freelancer {freelancer} on job request {job_request}")]
    DuplicateRequest {
        /// Job request of the proposal.
        job_request: JobRequestId,
        /// Freelancer of the proposal.
        freelancer: FreelancerId,
        /// Record that already exists.
        kind: RequestKind,
    },

    /// Accepting would exceed the requested number of freelancers.
    #[error("job request {job_request} already has {capacity} bookings")]
    AlreadyFull {
        /// Job request that is full.
        job_request: JobRequestId,
        /// Its requested number of freelancers.
        capacity: FreelancerCount,
    },

    /// The freelancer already holds a booking on the job request.
    #[error("freelancer {freelancer} is already booked on job request {job_request}")]
    AlreadyBooked {
        /// Job request of the booking.
        job_request: JobRequestId,
        /// Freelancer holding it.
        freelancer: FreelancerId,
    },

    /// The invitation was accepted or declined earlier.
    #[error("invitation {invitation} is already {status}")]
    InvitationResolved {
        /// Invitation being answered.
        invitation: InvitationId,
        /// Its resolved status.
        status: InvitationStatus,
    },

    /// The invitation belongs to a different freelancer.
    #[error("invitation {invitation} was not sent to freelancer {freelancer}")]
    NotInvited {
        /// Invitation being answered.
        invitation: InvitationId,
        /// Freelancer who tried to answer it.
        freelancer: FreelancerId,
    },
}

impl BookingDomainError {
    /// Returns the message shown to the admin or freelancer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::DuplicateRequest {
                kind: RequestKind::Invitation,
                ..
            } => "That invitation already exists.",
            Self::DuplicateRequest {
                kind: RequestKind::Booking,
                ..
            } => "That booking already exists.",
            Self::AlreadyFull { .. } => "This job is fully booked.",
            Self::AlreadyBooked { .. } => "You are already booked for this job.",
            Self::InvitationResolved { .. } => "That invitation has already been answered.",
            Self::NotInvited { .. } => "That invitation is not for you.",
        }
    }
}

/// Error returned when parsing an invitation status code fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invitation status: {0}")]
pub struct ParseInvitationStatusError(pub String);
