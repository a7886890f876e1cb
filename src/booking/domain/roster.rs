//! Per-job roster of invitations and bookings, and the rules guarding it.
//!
//! Rules are evaluated against a snapshot of one job request's roster. Callers
//! that mutate the roster must hold that job request's critical section for
//! the whole check-and-insert, otherwise two writers can both pass a check.

use super::{Booking, BookingDomainError, Invitation, InvitationId, InvitationStatus, RequestKind};
use crate::job::domain::{FreelancerCount, FreelancerId, JobRequestId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Invitations and bookings of one job request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRoster {
    job_request: JobRequestId,
    invitations: Vec<Invitation>,
    bookings: Vec<Booking>,
}

impl JobRoster {
    /// Creates an empty roster.
    #[must_use]
    pub const fn new(job_request: JobRequestId) -> Self {
        Self {
            job_request,
            invitations: Vec::new(),
            bookings: Vec::new(),
        }
    }

    /// Creates a roster from loaded records.
    #[must_use]
    pub const fn from_parts(
        job_request: JobRequestId,
        invitations: Vec<Invitation>,
        bookings: Vec<Booking>,
    ) -> Self {
        Self {
            job_request,
            invitations,
            bookings,
        }
    }

    /// Returns the job request.
    #[must_use]
    pub const fn job_request(&self) -> JobRequestId {
        self.job_request
    }

    /// Returns every invitation, oldest first.
    #[must_use]
    pub fn invitations(&self) -> &[Invitation] {
        &self.invitations
    }

    /// Returns every booking, oldest first.
    #[must_use]
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Finds an invitation on this roster.
    #[must_use]
    pub fn invitation(&self, id: InvitationId) -> Option<&Invitation> {
        self.invitations.iter().find(|invitation| invitation.id() == id)
    }

    /// Returns the freelancers holding a booking, in booking order.
    #[must_use]
    pub fn booked_freelancers(&self) -> Vec<FreelancerId> {
        self.bookings.iter().map(Booking::freelancer).collect()
    }

    /// Returns whether another booking fits within `capacity`.
    #[must_use]
    pub fn has_capacity(&self, capacity: FreelancerCount) -> bool {
        self.bookings.len() < capacity.as_usize()
    }

    fn is_booked(&self, freelancer: FreelancerId) -> bool {
        self.bookings
            .iter()
            .any(|booking| booking.freelancer() == freelancer)
    }

    fn is_invited(&self, freelancer: FreelancerId) -> bool {
        self.invitations
            .iter()
            .any(|invitation| invitation.freelancer() == freelancer)
    }

    fn duplicate(&self, freelancer: FreelancerId, kind: RequestKind) -> BookingDomainError {
        BookingDomainError::DuplicateRequest {
            job_request: self.job_request,
            freelancer,
            kind,
        }
    }

    /// Checks that `freelancer` may be invited.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::DuplicateRequest`] when an invitation or
    /// booking already exists for the freelancer.
    pub fn ensure_can_invite(&self, freelancer: FreelancerId) -> Result<(), BookingDomainError> {
        if self.is_invited(freelancer) {
            return Err(self.duplicate(freelancer, RequestKind::Invitation));
        }
        if self.is_booked(freelancer) {
            return Err(self.duplicate(freelancer, RequestKind::Booking));
        }
        Ok(())
    }

    /// Checks that `freelancer` may be booked without an invitation.
    ///
    /// Capacity is not checked on this path: admins may book beyond the
    /// requested number of freelancers.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::DuplicateRequest`] when a booking or
    /// invitation already exists for the freelancer.
    pub fn ensure_can_book_directly(
        &self,
        freelancer: FreelancerId,
    ) -> Result<(), BookingDomainError> {
        if self.is_booked(freelancer) {
            return Err(self.duplicate(freelancer, RequestKind::Booking));
        }
        if self.is_invited(freelancer) {
            return Err(self.duplicate(freelancer, RequestKind::Invitation));
        }
        Ok(())
    }

    /// Checks that `invitation` may be accepted.
    ///
    /// # Errors
    ///
    /// In order of precedence: [`BookingDomainError::AlreadyBooked`] when the
    /// invitee already holds a booking, [`BookingDomainError::InvitationResolved`]
    /// when the invitation was answered before, and
    /// [`BookingDomainError::AlreadyFull`] when `capacity` bookings exist.
    pub fn ensure_can_accept(
        &self,
        invitation: &Invitation,
        capacity: FreelancerCount,
    ) -> Result<(), BookingDomainError> {
        if self.is_booked(invitation.freelancer()) {
            return Err(BookingDomainError::AlreadyBooked {
                job_request: self.job_request,
                freelancer: invitation.freelancer(),
            });
        }
        invitation.ensure_pending()?;
        if !self.has_capacity(capacity) {
            return Err(BookingDomainError::AlreadyFull {
                job_request: self.job_request,
                capacity,
            });
        }
        Ok(())
    }

    /// Adds `invitation` after checking [`Self::ensure_can_invite`].
    ///
    /// # Errors
    ///
    /// Propagates the rule rejection; the roster is unchanged.
    pub fn add_invitation(&mut self, invitation: Invitation) -> Result<(), BookingDomainError> {
        self.ensure_can_invite(invitation.freelancer())?;
        self.invitations.push(invitation);
        Ok(())
    }

    /// Adds a direct `booking` after checking [`Self::ensure_can_book_directly`].
    ///
    /// # Errors
    ///
    /// Propagates the rule rejection; the roster is unchanged.
    pub fn add_direct_booking(&mut self, booking: Booking) -> Result<(), BookingDomainError> {
        self.ensure_can_book_directly(booking.freelancer())?;
        self.bookings.push(booking);
        Ok(())
    }

    /// Accepts the invitation `booking` originates from and adds the booking.
    ///
    /// Returns the accepted invitation, or `None` when the invitation is not
    /// on this roster.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::ensure_can_accept`]; the roster is unchanged.
    pub fn accept(
        &mut self,
        invitation_id: InvitationId,
        booking: Booking,
        capacity: FreelancerCount,
    ) -> Result<Option<Invitation>, BookingDomainError> {
        let Some(mut accepted) = self.invitation(invitation_id).cloned() else {
            return Ok(None);
        };
        self.ensure_can_accept(&accepted, capacity)?;
        accepted.resolve(InvitationStatus::Accepted, booking.created_at())?;
        if let Some(stored) = self
            .invitations
            .iter_mut()
            .find(|invitation| invitation.id() == invitation_id)
        {
            stored.clone_from(&accepted);
        }
        self.bookings.push(booking);
        Ok(Some(accepted))
    }

    /// Declines a pending invitation.
    ///
    /// Returns the declined invitation, or `None` when the invitation is not
    /// on this roster.
    ///
    /// # Errors
    ///
    /// Returns [`BookingDomainError::InvitationResolved`] when the invitation
    /// was answered before.
    pub fn decline(
        &mut self,
        invitation_id: InvitationId,
        at: DateTime<Utc>,
    ) -> Result<Option<Invitation>, BookingDomainError> {
        let Some(invitation) = self
            .invitations
            .iter_mut()
            .find(|invitation| invitation.id() == invitation_id)
        else {
            return Ok(None);
        };
        invitation.resolve(InvitationStatus::Declined, at)?;
        Ok(Some(invitation.clone()))
    }
}
