//! Repository port for invitations and bookings.
//!
//! Implementations own the per-job-request critical section: every mutating
//! method evaluates the [`JobRoster`] rules and writes its change without
//! another writer on the same job request interleaving. Writers on different
//! job requests must not block each other.

use crate::booking::domain::{
    Booking, BookingDomainError, BookingId, Invitation, InvitationId, JobRoster,
};
use crate::job::domain::{FreelancerCount, FreelancerId, JobRequestId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for booking repository operations.
pub type BookingRepositoryResult<T> = Result<T, BookingRepositoryError>;

/// Invitation and booking persistence contract.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Stores a new pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::JobRequestNotFound`] for an unknown
    /// job request, or [`BookingRepositoryError::Rule`] with
    /// [`BookingDomainError::DuplicateRequest`] when the pair already has an
    /// invitation or booking.
    async fn insert_invitation(&self, invitation: &Invitation) -> BookingRepositoryResult<()>;

    /// Stores a booking made without an invitation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::JobRequestNotFound`] for an unknown
    /// job request, or [`BookingRepositoryError::Rule`] with
    /// [`BookingDomainError::DuplicateRequest`] when the pair already has an
    /// invitation or booking.
    async fn insert_direct_booking(&self, booking: &Booking) -> BookingRepositoryResult<()>;

    /// Stores `booking` and marks the invitation accepted as one change.
    ///
    /// Returns the accepted invitation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::InvitationNotFound`] for an unknown
    /// invitation, or [`BookingRepositoryError::Rule`] when
    /// [`JobRoster::ensure_can_accept`] rejects the acceptance.
    async fn accept_invitation(
        &self,
        invitation_id: InvitationId,
        booking: &Booking,
        capacity: FreelancerCount,
    ) -> BookingRepositoryResult<Invitation>;

    /// Marks a pending invitation declined.
    ///
    /// Returns the declined invitation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingRepositoryError::InvitationNotFound`] for an unknown
    /// invitation, or [`BookingRepositoryError::Rule`] when it was answered
    /// before.
    async fn decline_invitation(
        &self,
        invitation_id: InvitationId,
        at: DateTime<Utc>,
    ) -> BookingRepositoryResult<Invitation>;

    /// Finds an invitation by identifier.
    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> BookingRepositoryResult<Option<Invitation>>;

    /// Finds a booking by identifier.
    async fn find_booking(&self, id: BookingId) -> BookingRepositoryResult<Option<Booking>>;

    /// Returns the invitations and bookings of a job request.
    async fn roster(&self, job_request: JobRequestId) -> BookingRepositoryResult<JobRoster>;

    /// Returns the freelancer's pending invitations, oldest first.
    async fn open_invitations_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> BookingRepositoryResult<Vec<Invitation>>;

    /// Returns the freelancer's bookings, oldest first.
    async fn bookings_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> BookingRepositoryResult<Vec<Booking>>;
}

/// Errors returned by booking repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BookingRepositoryError {
    /// A guard rule rejected the change.
    #[error(transparent)]
    Rule(#[from] BookingDomainError),

    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),

    /// The job request the change belongs to does not exist.
    #[error("job request not found: {0}")]
    JobRequestNotFound(JobRequestId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BookingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
