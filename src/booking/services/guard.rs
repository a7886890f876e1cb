//! Consistency guard for inviting and booking freelancers.

use crate::booking::{
    domain::{Booking, BookingDomainError, Invitation, InvitationId},
    ports::{BookingRepository, BookingRepositoryError},
};
use crate::job::domain::{FreelancerCount, FreelancerId, JobRequestId};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for guarded invitation and booking operations.
#[derive(Debug, Clone, Error)]
pub enum BookingGuardError {
    /// A guard rule rejected the proposal.
    #[error(transparent)]
    Rule(BookingDomainError),
    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(BookingRepositoryError),
}

impl From<BookingDomainError> for BookingGuardError {
    fn from(err: BookingDomainError) -> Self {
        Self::Rule(err)
    }
}

impl From<BookingRepositoryError> for BookingGuardError {
    fn from(err: BookingRepositoryError) -> Self {
        match err {
            BookingRepositoryError::Rule(rule) => Self::Rule(rule),
            BookingRepositoryError::InvitationNotFound(id) => Self::InvitationNotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for booking guard operations.
pub type BookingGuardResult<T> = Result<T, BookingGuardError>;

/// Outcome of a successful acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedInvitation {
    /// The invitation, now accepted.
    pub invitation: Invitation,
    /// The booking it produced.
    pub booking: Booking,
}

/// Guards invitation and booking creation for job requests.
///
/// Does not look at job request status: invitations and bookings may be
/// proposed whatever state the job request is in.
#[derive(Clone)]
pub struct BookingGuard<B, C>
where
    B: BookingRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<B>,
    clock: Arc<C>,
}

impl<B, C> BookingGuard<B, C>
where
    B: BookingRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new booking guard.
    #[must_use]
    pub const fn new(repository: Arc<B>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Invites `freelancer` to `job_request`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingGuardError::Rule`] with
    /// [`BookingDomainError::DuplicateRequest`] when the pair already has an
    /// invitation or booking, or [`BookingGuardError::Repository`] when
    /// persistence fails.
    pub async fn propose_invitation(
        &self,
        job_request: JobRequestId,
        freelancer: FreelancerId,
    ) -> BookingGuardResult<Invitation> {
        let invitation = Invitation::new(job_request, freelancer, &*self.clock);
        self.repository.insert_invitation(&invitation).await?;
        Ok(invitation)
    }

    /// Books `freelancer` onto `job_request` without an invitation.
    ///
    /// The requested number of freelancers is not enforced here.
    ///
    /// # Errors
    ///
    /// Returns [`BookingGuardError::Rule`] with
    /// [`BookingDomainError::DuplicateRequest`] when the pair already has an
    /// invitation or booking, or [`BookingGuardError::Repository`] when
    /// persistence fails.
    pub async fn propose_booking(
        &self,
        job_request: JobRequestId,
        freelancer: FreelancerId,
    ) -> BookingGuardResult<Booking> {
        let booking = Booking::direct(job_request, freelancer, &*self.clock);
        self.repository.insert_direct_booking(&booking).await?;
        Ok(booking)
    }

    /// Accepts an invitation on behalf of `freelancer`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingGuardError::InvitationNotFound`] for an unknown
    /// invitation; [`BookingGuardError::Rule`] with
    /// [`BookingDomainError::NotInvited`], [`BookingDomainError::AlreadyBooked`],
    /// [`BookingDomainError::InvitationResolved`] or
    /// [`BookingDomainError::AlreadyFull`] when a rule rejects it; or
    /// [`BookingGuardError::Repository`] when persistence fails.
    pub async fn accept_invitation(
        &self,
        invitation_id: InvitationId,
        freelancer: FreelancerId,
        capacity: FreelancerCount,
    ) -> BookingGuardResult<AcceptedInvitation> {
        let invitation = self
            .repository
            .find_invitation(invitation_id)
            .await?
            .ok_or(BookingGuardError::InvitationNotFound(invitation_id))?;
        invitation.ensure_addressed_to(freelancer)?;

        let booking = Booking::from_invitation(&invitation, &*self.clock);
        let accepted = self
            .repository
            .accept_invitation(invitation_id, &booking, capacity)
            .await?;
        Ok(AcceptedInvitation {
            invitation: accepted,
            booking,
        })
    }

    /// Declines a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingGuardError::InvitationNotFound`] for an unknown
    /// invitation, [`BookingGuardError::Rule`] with
    /// [`BookingDomainError::InvitationResolved`] when it was answered before,
    /// or [`BookingGuardError::Repository`] when persistence fails.
    pub async fn decline_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> BookingGuardResult<Invitation> {
        let declined = self
            .repository
            .decline_invitation(invitation_id, self.clock.utc())
            .await?;
        Ok(declined)
    }
}
