//! In-memory booking repository with one lock per job request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::booking::{
    domain::{Booking, BookingId, Invitation, InvitationId, JobRoster},
    ports::{BookingRepository, BookingRepositoryError, BookingRepositoryResult},
};
use crate::job::{
    adapters::memory::InMemoryJobRequestRepository,
    domain::{FreelancerCount, FreelancerId, JobRequestId},
};

type RosterHandle = Arc<Mutex<JobRoster>>;

/// Thread-safe in-memory booking repository.
///
/// Each job request's roster sits behind its own mutex, held for the whole
/// check-and-insert. The outer index lock is only held long enough to find
/// or create a roster handle and is never awaited on. Rosters are only
/// created for job requests present in the shared job request repository.
#[derive(Debug, Clone)]
pub struct InMemoryBookingRepository {
    job_requests: InMemoryJobRequestRepository,
    state: Arc<RwLock<InMemoryBookingState>>,
}

#[derive(Debug, Default)]
struct InMemoryBookingState {
    rosters: HashMap<JobRequestId, RosterHandle>,
    invitation_jobs: HashMap<InvitationId, JobRequestId>,
    booking_jobs: HashMap<BookingId, JobRequestId>,
}

fn poisoned(err: impl ToString) -> BookingRepositoryError {
    BookingRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn lock(handle: &RosterHandle) -> BookingRepositoryResult<MutexGuard<'_, JobRoster>> {
    handle.lock().map_err(poisoned)
}

impl InMemoryBookingRepository {
    /// Creates an empty repository over the given job requests.
    #[must_use]
    pub fn new(job_requests: InMemoryJobRequestRepository) -> Self {
        Self {
            job_requests,
            state: Arc::default(),
        }
    }

    fn read(&self) -> BookingRepositoryResult<RwLockReadGuard<'_, InMemoryBookingState>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> BookingRepositoryResult<RwLockWriteGuard<'_, InMemoryBookingState>> {
        self.state.write().map_err(poisoned)
    }

    fn roster_handle(&self, job_request: JobRequestId) -> BookingRepositoryResult<RosterHandle> {
        if let Some(handle) = self.read()?.rosters.get(&job_request) {
            return Ok(Arc::clone(handle));
        }
        let known = self
            .job_requests
            .contains(job_request)
            .map_err(BookingRepositoryError::persistence)?;
        if !known {
            return Err(BookingRepositoryError::JobRequestNotFound(job_request));
        }
        let mut state = self.write()?;
        let handle = state
            .rosters
            .entry(job_request)
            .or_insert_with(|| Arc::new(Mutex::new(JobRoster::new(job_request))));
        Ok(Arc::clone(handle))
    }

    fn invitation_handle(&self, id: InvitationId) -> BookingRepositoryResult<RosterHandle> {
        let job_request = self
            .read()?
            .invitation_jobs
            .get(&id)
            .copied()
            .ok_or(BookingRepositoryError::InvitationNotFound(id))?;
        self.roster_handle(job_request)
    }

    fn all_rosters(&self) -> BookingRepositoryResult<Vec<JobRoster>> {
        let handles: Vec<RosterHandle> = self.read()?.rosters.values().cloned().collect();
        handles
            .iter()
            .map(|handle| lock(handle).map(|roster| roster.clone()))
            .collect()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_invitation(&self, invitation: &Invitation) -> BookingRepositoryResult<()> {
        let handle = self.roster_handle(invitation.job_request())?;
        let mut roster = lock(&handle)?;
        roster.add_invitation(invitation.clone())?;
        self.write()?
            .invitation_jobs
            .insert(invitation.id(), invitation.job_request());
        Ok(())
    }

    async fn insert_direct_booking(&self, booking: &Booking) -> BookingRepositoryResult<()> {
        let handle = self.roster_handle(booking.job_request())?;
        let mut roster = lock(&handle)?;
        roster.add_direct_booking(booking.clone())?;
        self.write()?
            .booking_jobs
            .insert(booking.id(), booking.job_request());
        Ok(())
    }

    async fn accept_invitation(
        &self,
        invitation_id: InvitationId,
        booking: &Booking,
        capacity: FreelancerCount,
    ) -> BookingRepositoryResult<Invitation> {
        let handle = self.invitation_handle(invitation_id)?;
        let mut roster = lock(&handle)?;
        let accepted = roster
            .accept(invitation_id, booking.clone(), capacity)?
            .ok_or(BookingRepositoryError::InvitationNotFound(invitation_id))?;
        self.write()?
            .booking_jobs
            .insert(booking.id(), booking.job_request());
        Ok(accepted)
    }

    async fn decline_invitation(
        &self,
        invitation_id: InvitationId,
        at: DateTime<Utc>,
    ) -> BookingRepositoryResult<Invitation> {
        let handle = self.invitation_handle(invitation_id)?;
        let mut roster = lock(&handle)?;
        roster
            .decline(invitation_id, at)?
            .ok_or(BookingRepositoryError::InvitationNotFound(invitation_id))
    }

    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> BookingRepositoryResult<Option<Invitation>> {
        let handle = match self.invitation_handle(id) {
            Ok(handle) => handle,
            Err(BookingRepositoryError::InvitationNotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let roster = lock(&handle)?;
        Ok(roster.invitation(id).cloned())
    }

    async fn find_booking(&self, id: BookingId) -> BookingRepositoryResult<Option<Booking>> {
        let Some(job_request) = self.read()?.booking_jobs.get(&id).copied() else {
            return Ok(None);
        };
        let handle = self.roster_handle(job_request)?;
        let roster = lock(&handle)?;
        Ok(roster
            .bookings()
            .iter()
            .find(|booking| booking.id() == id)
            .cloned())
    }

    async fn roster(&self, job_request: JobRequestId) -> BookingRepositoryResult<JobRoster> {
        let handle = self.read()?.rosters.get(&job_request).cloned();
        match handle {
            Some(existing) => Ok(lock(&existing)?.clone()),
            None => Ok(JobRoster::new(job_request)),
        }
    }

    async fn open_invitations_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> BookingRepositoryResult<Vec<Invitation>> {
        let mut found: Vec<Invitation> = self
            .all_rosters()?
            .iter()
            .flat_map(JobRoster::invitations)
            .filter(|invitation| {
                invitation.freelancer() == freelancer && invitation.status().is_pending()
            })
            .cloned()
            .collect();
        found.sort_by_key(Invitation::created_at);
        Ok(found)
    }

    async fn bookings_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> BookingRepositoryResult<Vec<Booking>> {
        let mut found: Vec<Booking> = self
            .all_rosters()?
            .iter()
            .flat_map(JobRoster::bookings)
            .filter(|booking| booking.freelancer() == freelancer)
            .cloned()
            .collect();
        found.sort_by_key(Booking::created_at);
        Ok(found)
    }
}
