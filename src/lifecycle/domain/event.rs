//! Lifecycle events handed to notification collaborators.

use crate::booking::domain::{Booking, Invitation};
use crate::job::domain::{FreelancerId, JobRequestId, StatusChange};
use serde::Serialize;

/// Event published after a lifecycle change has been committed.
///
/// Payloads reference entities; rendering them into emails or messages is the
/// subscriber's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A job request changed status.
    JobStatusChanged {
        /// Job request that changed.
        job_request: JobRequestId,
        /// Trigger, source and target status.
        change: StatusChange,
    },
    /// A freelancer was invited.
    InvitationCreated {
        /// The new invitation.
        invitation: Invitation,
    },
    /// A freelancer declined an invitation.
    InvitationDeclined {
        /// The declined invitation.
        invitation: Invitation,
    },
    /// A freelancer was booked.
    BookingCreated {
        /// The new booking.
        booking: Booking,
    },
    /// A job request was completed.
    JobCompleted {
        /// Completed job request.
        job_request: JobRequestId,
        /// Freelancers who worked it, to be asked for feedback.
        booked_freelancers: Vec<FreelancerId>,
    },
}

/// Discriminant of a [`LifecycleEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    /// See [`LifecycleEvent::JobStatusChanged`].
    JobStatusChanged,
    /// See [`LifecycleEvent::InvitationCreated`].
    InvitationCreated,
    /// See [`LifecycleEvent::InvitationDeclined`].
    InvitationDeclined,
    /// See [`LifecycleEvent::BookingCreated`].
    BookingCreated,
    /// See [`LifecycleEvent::JobCompleted`].
    JobCompleted,
}

impl LifecycleEvent {
    /// Returns the event's kind.
    #[must_use]
    pub const fn kind(&self) -> LifecycleEventKind {
        match self {
            Self::JobStatusChanged { .. } => LifecycleEventKind::JobStatusChanged,
            Self::InvitationCreated { .. } => LifecycleEventKind::InvitationCreated,
            Self::InvitationDeclined { .. } => LifecycleEventKind::InvitationDeclined,
            Self::BookingCreated { .. } => LifecycleEventKind::BookingCreated,
            Self::JobCompleted { .. } => LifecycleEventKind::JobCompleted,
        }
    }

    /// Returns the job request the event concerns.
    #[must_use]
    pub const fn job_request(&self) -> JobRequestId {
        match self {
            Self::JobStatusChanged { job_request, .. } | Self::JobCompleted { job_request, .. } => {
                *job_request
            }
            Self::InvitationCreated { invitation } | Self::InvitationDeclined { invitation } => {
                invitation.job_request()
            }
            Self::BookingCreated { booking } => booking.job_request(),
        }
    }
}
