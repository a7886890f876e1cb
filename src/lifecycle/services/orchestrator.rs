//! Orchestrates job request transitions, guarded bookings and events.
//!
//! Events are published only after the change they describe is stored. A
//! sink failure is logged and never undoes or fails the operation.

use crate::booking::{
    domain::{Booking, BookingDomainError, Invitation, InvitationId, JobRoster},
    ports::{BookingRepository, BookingRepositoryError},
    services::{AcceptedInvitation, BookingGuard, BookingGuardError},
};
use crate::config::BookingPolicy;
use crate::job::{
    domain::{
        ClientId, FreelancerId, JobDomainError, JobRequest, JobRequestId, JobSchedule,
        JobTrigger, NewJobRequest, StatusChange,
    },
    ports::{JobRequestRepository, JobRequestRepositoryError},
};
use crate::lifecycle::{
    domain::LifecycleEvent,
    ports::{EventSink, FreelancerDirectory, FreelancerDirectoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Service-level errors for lifecycle operations.
///
/// Guard rejections surface as [`JobLifecycleError::Booking`] whichever
/// layer detected them.
#[derive(Debug, Clone, Error)]
pub enum JobLifecycleError {
    /// A job request rule was violated, e.g. an invalid transition.
    #[error(transparent)]
    Job(#[from] JobDomainError),
    /// An invitation or booking rule was violated.
    #[error(transparent)]
    Booking(#[from] BookingDomainError),
    /// Job request persistence failed.
    #[error(transparent)]
    JobRepository(#[from] JobRequestRepositoryError),
    /// Invitation or booking persistence failed.
    #[error(transparent)]
    BookingRepository(BookingRepositoryError),
    /// The freelancer directory failed.
    #[error(transparent)]
    Directory(#[from] FreelancerDirectoryError),
    /// The job request does not exist.
    #[error("job request not found: {0}")]
    JobRequestNotFound(JobRequestId),
    /// The invitation does not exist.
    #[error("invitation not found: {0}")]
    InvitationNotFound(InvitationId),
}

impl From<BookingRepositoryError> for JobLifecycleError {
    fn from(err: BookingRepositoryError) -> Self {
        match err {
            BookingRepositoryError::Rule(rule) => Self::Booking(rule),
            BookingRepositoryError::InvitationNotFound(id) => Self::InvitationNotFound(id),
            BookingRepositoryError::JobRequestNotFound(id) => Self::JobRequestNotFound(id),
            BookingRepositoryError::Persistence(_) => Self::BookingRepository(err),
        }
    }
}

impl From<BookingGuardError> for JobLifecycleError {
    fn from(err: BookingGuardError) -> Self {
        match err {
            BookingGuardError::Rule(rule) => Self::Booking(rule),
            BookingGuardError::InvitationNotFound(id) => Self::InvitationNotFound(id),
            BookingGuardError::Repository(repository) => Self::from(repository),
        }
    }
}

/// Result type for lifecycle operations.
pub type JobLifecycleResult<T> = Result<T, JobLifecycleError>;

/// What an admin decided for a freelancer outside the bulk invitation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// Invite the freelancer.
    Invite,
    /// Book the freelancer directly.
    Book,
}

/// Admin decision about one freelancer and one job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminDecision {
    /// Job request concerned.
    pub job_request: JobRequestId,
    /// Freelancer concerned.
    pub freelancer: FreelancerId,
    /// Invite or book.
    pub action: AdminAction,
}

/// Record created by an [`AdminDecision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// An invitation was created.
    Invited(Invitation),
    /// A booking was created.
    Booked(Booking),
}

/// Result of opening a job request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedJob {
    /// The job request after opening.
    pub job_request: JobRequest,
    /// The status transition.
    pub change: StatusChange,
    /// Invitations created for matching freelancers.
    pub invited: Vec<Invitation>,
    /// Matching freelancers skipped because they were already invited or
    /// booked.
    pub already_invited: usize,
}

/// Result of a completion sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSweep {
    /// Job requests completed by this sweep.
    pub completed: Vec<JobRequestId>,
    /// Job requests another writer moved first.
    pub skipped: usize,
}

/// Job request lifecycle orchestration service.
#[derive(Clone)]
pub struct JobLifecycleService<J, B, D, E, C>
where
    J: JobRequestRepository,
    B: BookingRepository,
    D: FreelancerDirectory,
    E: EventSink,
    C: Clock + Send + Sync,
{
    job_requests: Arc<J>,
    bookings: Arc<B>,
    guard: BookingGuard<B, C>,
    directory: Arc<D>,
    events: Arc<E>,
    clock: Arc<C>,
    policy: BookingPolicy,
}

impl<J, B, D, E, C> JobLifecycleService<J, B, D, E, C>
where
    J: JobRequestRepository,
    B: BookingRepository,
    D: FreelancerDirectory,
    E: EventSink,
    C: Clock + Send + Sync,
{
    /// Creates a lifecycle service with the default [`BookingPolicy`].
    #[must_use]
    pub fn new(
        job_requests: Arc<J>,
        bookings: Arc<B>,
        directory: Arc<D>,
        events: Arc<E>,
        clock: Arc<C>,
    ) -> Self {
        let guard = BookingGuard::new(Arc::clone(&bookings), Arc::clone(&clock));
        Self {
            job_requests,
            bookings,
            guard,
            directory,
            events,
            clock,
            policy: BookingPolicy::default(),
        }
    }

    /// Replaces the booking policy.
    #[must_use]
    pub fn with_policy(mut self, policy: BookingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Creates a job request awaiting payment.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Job`] when the pay rate breaks the
    /// policy or the start time does not exist, or
    /// [`JobLifecycleError::JobRepository`] when persistence fails.
    pub async fn create_job_request(
        &self,
        request: NewJobRequest,
    ) -> JobLifecycleResult<JobRequest> {
        request
            .pay_per_hour
            .ensure_meets(self.policy.minimum_pay_per_hour(), self.policy.currency())?;
        let id = self.job_requests.next_id().await?;
        let job_request = JobRequest::new(id, request, self.policy.timezone(), &*self.clock)?;
        self.job_requests.store(&job_request).await?;
        info!(
            job_request = %id,
            client = %job_request.client(),
            service = %job_request.service().service_kind(),
            "job request created"
        );
        Ok(job_request)
    }

    /// Opens a job request and invites every matching freelancer.
    ///
    /// Freelancers already invited or booked, for instance by an earlier
    /// open, are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Job`] when the job request cannot be
    /// opened from its current status, [`JobLifecycleError::Directory`] when
    /// matching fails (the job request stays unopened), or a repository error.
    pub async fn open_job(&self, id: JobRequestId) -> JobLifecycleResult<OpenedJob> {
        let current = self.load(id).await?;
        let expected = current.status();
        let mut opened = current.clone();
        let change = opened.fire(JobTrigger::Open, &*self.clock)?;
        let matches = self.directory.find_matching(&current).await?;

        self.job_requests.update_status(&opened, expected).await?;
        self.status_changed(id, change).await;

        let mut invited = Vec::new();
        let mut already_invited = 0_usize;
        for freelancer in matches {
            match self.guard.propose_invitation(id, freelancer).await {
                Ok(invitation) => {
                    self.publish(LifecycleEvent::InvitationCreated {
                        invitation: invitation.clone(),
                    })
                    .await;
                    invited.push(invitation);
                }
                Err(BookingGuardError::Rule(BookingDomainError::DuplicateRequest {
                    kind, ..
                })) => {
                    debug!(job_request = %id, freelancer = %freelancer, %kind, "skipping matched freelancer");
                    already_invited += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(
            job_request = %id,
            invited = invited.len(),
            already_invited,
            "job request opened"
        );
        Ok(OpenedJob {
            job_request: opened,
            change,
            invited,
            already_invited,
        })
    }

    /// Fires `trigger` as an administrative override, without fan-out.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::Job`] with
    /// [`JobDomainError::InvalidTransition`] when the trigger is not allowed,
    /// [`JobLifecycleError::JobRequestNotFound`], or a repository error
    /// (including a status conflict with a concurrent writer).
    pub async fn transition(
        &self,
        id: JobRequestId,
        trigger: JobTrigger,
    ) -> JobLifecycleResult<JobRequest> {
        let mut job_request = self.load(id).await?;
        let expected = job_request.status();
        let change = job_request.fire(trigger, &*self.clock)?;
        self.job_requests
            .update_status(&job_request, expected)
            .await?;
        self.status_changed(id, change).await;
        Ok(job_request)
    }

    /// Invites or books a single freelancer on an admin's decision.
    ///
    /// Direct bookings are not capped by the requested number of
    /// freelancers; exceeding it is logged.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::JobRequestNotFound`],
    /// [`JobLifecycleError::Booking`] with
    /// [`BookingDomainError::DuplicateRequest`], or a repository error.
    pub async fn confirm_or_invite_decision(
        &self,
        decision: AdminDecision,
    ) -> JobLifecycleResult<DecisionOutcome> {
        let job_request = self.load(decision.job_request).await?;
        match decision.action {
            AdminAction::Invite => {
                let invitation = self
                    .guard
                    .propose_invitation(decision.job_request, decision.freelancer)
                    .await?;
                info!(job_request = %decision.job_request, freelancer = %decision.freelancer, "freelancer invited");
                self.publish(LifecycleEvent::InvitationCreated {
                    invitation: invitation.clone(),
                })
                .await;
                Ok(DecisionOutcome::Invited(invitation))
            }
            AdminAction::Book => {
                let booking = self
                    .guard
                    .propose_booking(decision.job_request, decision.freelancer)
                    .await?;
                info!(job_request = %decision.job_request, freelancer = %decision.freelancer, "freelancer booked directly");
                self.warn_if_over_capacity(&job_request).await;
                self.publish(LifecycleEvent::BookingCreated {
                    booking: booking.clone(),
                })
                .await;
                Ok(DecisionOutcome::Booked(booking))
            }
        }
    }

    /// Accepts an invitation on behalf of `freelancer`.
    ///
    /// The job request's status does not change.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::InvitationNotFound`], or
    /// [`JobLifecycleError::Booking`] with
    /// [`BookingDomainError::NotInvited`], [`BookingDomainError::AlreadyBooked`],
    /// [`BookingDomainError::InvitationResolved`] or
    /// [`BookingDomainError::AlreadyFull`].
    pub async fn accept_invitation(
        &self,
        invitation_id: InvitationId,
        freelancer: FreelancerId,
    ) -> JobLifecycleResult<AcceptedInvitation> {
        let invitation = self
            .bookings
            .find_invitation(invitation_id)
            .await?
            .ok_or(JobLifecycleError::InvitationNotFound(invitation_id))?;
        let job_request = self.load(invitation.job_request()).await?;
        let accepted = self
            .guard
            .accept_invitation(invitation_id, freelancer, job_request.number_of_freelancers())
            .await?;
        info!(
            job_request = %job_request.id(),
            freelancer = %freelancer,
            invitation = %invitation_id,
            "invitation accepted"
        );
        self.publish(LifecycleEvent::BookingCreated {
            booking: accepted.booking.clone(),
        })
        .await;
        Ok(accepted)
    }

    /// Declines a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::InvitationNotFound`], or
    /// [`JobLifecycleError::Booking`] with
    /// [`BookingDomainError::InvitationResolved`].
    pub async fn decline_invitation(
        &self,
        invitation_id: InvitationId,
    ) -> JobLifecycleResult<Invitation> {
        let declined = self.guard.decline_invitation(invitation_id).await?;
        info!(
            job_request = %declined.job_request(),
            freelancer = %declined.freelancer(),
            invitation = %invitation_id,
            "invitation declined"
        );
        self.publish(LifecycleEvent::InvitationDeclined {
            invitation: declined.clone(),
        })
        .await;
        Ok(declined)
    }

    /// Completes every confirmed job request whose end time has passed.
    ///
    /// Safe to re-run and to run concurrently: each job request is completed
    /// with a compare-and-set write, and one moved by another writer in the
    /// meantime is skipped.
    ///
    /// # Errors
    ///
    /// Returns a repository error when a lookup or write fails; job requests
    /// completed before the failure stay completed.
    pub async fn complete_if_past(&self) -> JobLifecycleResult<CompletionSweep> {
        let now = self.clock.utc();
        let due = self.job_requests.find_needing_completion(now).await?;
        let mut sweep = CompletionSweep::default();
        for mut job_request in due {
            let id = job_request.id();
            let expected = job_request.status();
            let roster = match self.bookings.roster(id).await {
                Ok(roster) => roster,
                Err(err) => {
                    warn!(job_request = %id, error = %err, "roster unavailable, completion deferred");
                    sweep.skipped += 1;
                    continue;
                }
            };
            let change = match job_request.fire(JobTrigger::Complete, &*self.clock) {
                Ok(change) => change,
                Err(JobDomainError::InvalidTransition { .. }) => {
                    sweep.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match self.job_requests.update_status(&job_request, expected).await {
                Ok(()) => {}
                Err(JobRequestRepositoryError::StatusConflict { actual, .. }) => {
                    debug!(job_request = %id, %actual, "job request moved before completion");
                    sweep.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
            self.status_changed(id, change).await;
            self.publish(LifecycleEvent::JobCompleted {
                job_request: id,
                booked_freelancers: roster.booked_freelancers(),
            })
            .await;
            sweep.completed.push(id);
        }
        info!(
            completed = sweep.completed.len(),
            skipped = sweep.skipped,
            "completion sweep finished"
        );
        Ok(sweep)
    }

    /// Moves a job request to a new schedule, recomputing its end time.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::JobRequestNotFound`],
    /// [`JobLifecycleError::Job`] when the new start does not exist, or a
    /// repository error.
    pub async fn reschedule(
        &self,
        id: JobRequestId,
        schedule: JobSchedule,
    ) -> JobLifecycleResult<JobRequest> {
        let mut job_request = self.load(id).await?;
        job_request.reschedule(schedule, self.policy.timezone(), &*self.clock)?;
        self.job_requests.update(&job_request).await?;
        info!(job_request = %id, end = %job_request.end_datetime(), "job request rescheduled");
        Ok(job_request)
    }

    /// Finds a job request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::JobRepository`] when lookup fails.
    pub async fn find_job_request(
        &self,
        id: JobRequestId,
    ) -> JobLifecycleResult<Option<JobRequest>> {
        Ok(self.job_requests.find_by_id(id).await?)
    }

    /// Returns a client's job requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::JobRepository`] when lookup fails.
    pub async fn job_requests_for_client(
        &self,
        client: ClientId,
    ) -> JobLifecycleResult<Vec<JobRequest>> {
        Ok(self.job_requests.find_for_client(client).await?)
    }

    /// Returns the invitations and bookings of a job request.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::BookingRepository`] when lookup fails.
    pub async fn roster(&self, id: JobRequestId) -> JobLifecycleResult<JobRoster> {
        Ok(self.bookings.roster(id).await?)
    }

    /// Returns a freelancer's pending invitations.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::BookingRepository`] when lookup fails.
    pub async fn open_invitations_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> JobLifecycleResult<Vec<Invitation>> {
        Ok(self
            .bookings
            .open_invitations_for_freelancer(freelancer)
            .await?)
    }

    /// Returns a freelancer's bookings.
    ///
    /// # Errors
    ///
    /// Returns [`JobLifecycleError::BookingRepository`] when lookup fails.
    pub async fn bookings_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> JobLifecycleResult<Vec<Booking>> {
        Ok(self.bookings.bookings_for_freelancer(freelancer).await?)
    }

    async fn load(&self, id: JobRequestId) -> JobLifecycleResult<JobRequest> {
        self.job_requests
            .find_by_id(id)
            .await?
            .ok_or(JobLifecycleError::JobRequestNotFound(id))
    }

    /// Best-effort check after a direct booking has committed.
    async fn warn_if_over_capacity(&self, job_request: &JobRequest) {
        let id = job_request.id();
        let capacity = job_request.number_of_freelancers();
        match self.bookings.roster(id).await {
            Ok(roster) if roster.bookings().len() > capacity.as_usize() => {
                warn!(
                    job_request = %id,
                    bookings = roster.bookings().len(),
                    %capacity,
                    "direct booking exceeds requested number of freelancers"
                );
            }
            Ok(_) => {}
            Err(err) => {
                warn!(job_request = %id, error = %err, "could not check booking count");
            }
        }
    }

    async fn status_changed(&self, id: JobRequestId, change: StatusChange) {
        info!(
            job_request = %id,
            trigger = %change.trigger,
            from = %change.from,
            to = %change.to,
            "job request status changed"
        );
        self.publish(LifecycleEvent::JobStatusChanged {
            job_request: id,
            change,
        })
        .await;
    }

    async fn publish(&self, event: LifecycleEvent) {
        if let Err(err) = self.events.publish(&event).await {
            warn!(
                job_request = %event.job_request(),
                kind = ?event.kind(),
                error = %err,
                "failed to publish lifecycle event"
            );
        }
    }
}
