//! Job request aggregate root.

use super::{
    ClientId, FreelancerCount, JobDomainError, JobLocation, JobRequestId, JobSchedule, JobStatus,
    JobTrigger, PayRate, PhoneRequirement, ServiceDetails, StatusChange, YearsExperience,
};
use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Client-supplied content of a new job request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobRequest {
    /// Client placing the request.
    pub client: ClientId,
    /// Service-specific payload.
    pub service: ServiceDetails,
    /// Scheduled period.
    pub schedule: JobSchedule,
    /// Number of freelancers required.
    pub number_of_freelancers: FreelancerCount,
    /// Pay per hour, per freelancer.
    pub pay_per_hour: PayRate,
    /// Whether the pay includes tips.
    pub tips_included: bool,
    /// Minimum experience required.
    pub years_experience: YearsExperience,
    /// Smartphone requirement.
    pub phone_requirement: PhoneRequirement,
    /// Job address.
    pub location: JobLocation,
    /// Free-text notes for the freelancer.
    pub comments: String,
}

/// Job request aggregate root.
///
/// Status only changes through [`JobRequest::fire`], and `end_datetime` only
/// changes together with the schedule it is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    id: JobRequestId,
    client: ClientId,
    service: ServiceDetails,
    schedule: JobSchedule,
    end_datetime: DateTime<Utc>,
    number_of_freelancers: FreelancerCount,
    pay_per_hour: PayRate,
    tips_included: bool,
    years_experience: YearsExperience,
    phone_requirement: PhoneRequirement,
    location: JobLocation,
    comments: String,
    status: JobStatus,
    submitted_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobRequestData {
    /// Persisted identifier.
    pub id: JobRequestId,
    /// Persisted client.
    pub client: ClientId,
    /// Persisted service payload.
    pub service: ServiceDetails,
    /// Persisted schedule.
    pub schedule: JobSchedule,
    /// Persisted end timestamp.
    pub end_datetime: DateTime<Utc>,
    /// Persisted freelancer count.
    pub number_of_freelancers: FreelancerCount,
    /// Persisted pay rate.
    pub pay_per_hour: PayRate,
    /// Persisted tips flag.
    pub tips_included: bool,
    /// Persisted experience requirement.
    pub years_experience: YearsExperience,
    /// Persisted phone requirement.
    pub phone_requirement: PhoneRequirement,
    /// Persisted location.
    pub location: JobLocation,
    /// Persisted comments.
    pub comments: String,
    /// Persisted status.
    pub status: JobStatus,
    /// Persisted submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl JobRequest {
    /// Creates a job request in [`JobStatus::Checkout`].
    ///
    /// `tz` is the timezone the schedule's date and start time are given in.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NonexistentLocalTime`] when the scheduled
    /// start does not exist in `tz`.
    pub fn new<Tz: TimeZone>(
        id: JobRequestId,
        request: NewJobRequest,
        tz: &Tz,
        clock: &impl Clock,
    ) -> Result<Self, JobDomainError> {
        let end_datetime = request.schedule.end_datetime(tz)?;
        let timestamp = clock.utc();
        Ok(Self {
            id,
            client: request.client,
            service: request.service,
            schedule: request.schedule,
            end_datetime,
            number_of_freelancers: request.number_of_freelancers,
            pay_per_hour: request.pay_per_hour,
            tips_included: request.tips_included,
            years_experience: request.years_experience,
            phone_requirement: request.phone_requirement,
            location: request.location,
            comments: request.comments,
            status: JobStatus::Checkout,
            submitted_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a job request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobRequestData) -> Self {
        Self {
            id: data.id,
            client: data.client,
            service: data.service,
            schedule: data.schedule,
            end_datetime: data.end_datetime,
            number_of_freelancers: data.number_of_freelancers,
            pay_per_hour: data.pay_per_hour,
            tips_included: data.tips_included,
            years_experience: data.years_experience,
            phone_requirement: data.phone_requirement,
            location: data.location,
            comments: data.comments,
            status: data.status,
            submitted_at: data.submitted_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> JobRequestId {
        self.id
    }

    /// Returns the human-readable reference number.
    #[must_use]
    pub fn reference_number(&self) -> String {
        self.id.reference_number()
    }

    /// Returns the requesting client.
    #[must_use]
    pub const fn client(&self) -> ClientId {
        self.client
    }

    /// Returns the service payload.
    #[must_use]
    pub const fn service(&self) -> &ServiceDetails {
        &self.service
    }

    /// Returns the schedule.
    #[must_use]
    pub const fn schedule(&self) -> &JobSchedule {
        &self.schedule
    }

    /// Returns when the job finishes, in UTC.
    #[must_use]
    pub const fn end_datetime(&self) -> DateTime<Utc> {
        self.end_datetime
    }

    /// Returns the number of freelancers required, i.e. the booking capacity.
    #[must_use]
    pub const fn number_of_freelancers(&self) -> FreelancerCount {
        self.number_of_freelancers
    }

    /// Returns the pay per hour, per freelancer.
    #[must_use]
    pub const fn pay_per_hour(&self) -> &PayRate {
        &self.pay_per_hour
    }

    /// Returns whether the pay includes tips.
    #[must_use]
    pub const fn tips_included(&self) -> bool {
        self.tips_included
    }

    /// Returns the minimum experience required.
    #[must_use]
    pub const fn years_experience(&self) -> YearsExperience {
        self.years_experience
    }

    /// Returns the smartphone requirement.
    #[must_use]
    pub const fn phone_requirement(&self) -> PhoneRequirement {
        self.phone_requirement
    }

    /// Returns the job address.
    #[must_use]
    pub const fn location(&self) -> &JobLocation {
        &self.location
    }

    /// Returns the free-text comments.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns when the request was submitted.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the total the client pays for the job.
    #[must_use]
    pub fn client_total_cost(&self) -> Decimal {
        self.pay_per_hour
            .total_for(self.schedule.duration_hours(), self.number_of_freelancers)
    }

    /// Returns whether the job finished strictly before `now`.
    #[must_use]
    pub fn has_finished(&self, now: DateTime<Utc>) -> bool {
        self.end_datetime < now
    }

    /// Fires a status machine trigger.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidTransition`] when `trigger` is not
    /// permitted from the current status. The job request is left unchanged.
    pub fn fire(
        &mut self,
        trigger: JobTrigger,
        clock: &impl Clock,
    ) -> Result<StatusChange, JobDomainError> {
        let from = self.status;
        let to = from
            .apply(trigger)
            .ok_or(JobDomainError::InvalidTransition {
                job_request: self.id,
                trigger,
                from,
            })?;
        self.status = to;
        self.touch(clock);
        Ok(StatusChange { trigger, from, to })
    }

    /// Replaces the schedule and recomputes the end timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NonexistentLocalTime`] when the new start
    /// does not exist in `tz`; the job request is left unchanged.
    pub fn reschedule<Tz: TimeZone>(
        &mut self,
        schedule: JobSchedule,
        tz: &Tz,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.end_datetime = schedule.end_datetime(tz)?;
        self.schedule = schedule;
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
