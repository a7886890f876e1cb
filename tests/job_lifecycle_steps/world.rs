//! Shared world state for job lifecycle BDD scenarios.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use shiftwork::{
    booking::adapters::memory::InMemoryBookingRepository,
    job::{adapters::memory::InMemoryJobRequestRepository, domain::JobRequest},
    lifecycle::{
        adapters::memory::{InMemoryFreelancerDirectory, RecordingEventSink},
        services::{JobLifecycleError, JobLifecycleService},
    },
};

/// Clock that only moves when a step advances it.
#[derive(Debug)]
pub struct ScenarioClock {
    now: Mutex<DateTime<Utc>>,
}

impl ScenarioClock {
    fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Service type used by the BDD world.
pub type TestLifecycleService = JobLifecycleService<
    InMemoryJobRequestRepository,
    InMemoryBookingRepository,
    InMemoryFreelancerDirectory,
    RecordingEventSink,
    ScenarioClock,
>;

/// Scenario world for job lifecycle behaviour tests.
pub struct JobLifecycleWorld {
    pub service: TestLifecycleService,
    pub directory: InMemoryFreelancerDirectory,
    pub events: RecordingEventSink,
    pub clock: Arc<ScenarioClock>,
    pub job_request: Option<JobRequest>,
    pub last_error: Option<JobLifecycleError>,
}

impl JobLifecycleWorld {
    /// Creates a world with an empty marketplace.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2030, 2, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let clock = Arc::new(ScenarioClock::starting_at(start));
        let directory = InMemoryFreelancerDirectory::new();
        let events = RecordingEventSink::new();
        let job_requests = InMemoryJobRequestRepository::new();
        let service = JobLifecycleService::new(
            Arc::new(job_requests.clone()),
            Arc::new(InMemoryBookingRepository::new(job_requests)),
            Arc::new(directory.clone()),
            Arc::new(events.clone()),
            Arc::clone(&clock),
        );

        Self {
            service,
            directory,
            events,
            clock,
            job_request: None,
            last_error: None,
        }
    }

    /// Returns the scenario's job request.
    ///
    /// # Errors
    ///
    /// Returns an error when no job request has been created yet.
    pub fn job_request(&self) -> Result<&JobRequest, eyre::Report> {
        self.job_request
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing job request in scenario world"))
    }
}

impl Default for JobLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> JobLifecycleWorld {
    JobLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
