//! Shared helpers for lifecycle integration tests.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use rust_decimal::Decimal;
use shiftwork::{
    booking::adapters::memory::InMemoryBookingRepository,
    job::{
        adapters::memory::InMemoryJobRequestRepository,
        domain::{
            BarRole, ClientId, CurrencyCode, FreelancerCount, FreelancerId, JobLocation,
            JobSchedule, NewJobRequest, PayRate, PhoneRequirement, PhoneType, ServiceDetails,
            ServiceKind, YearsExperience,
        },
    },
    lifecycle::{
        adapters::memory::{FreelancerProfile, InMemoryFreelancerDirectory, RecordingEventSink},
        services::JobLifecycleService,
    },
};
use std::sync::{Arc, Mutex, PoisonError};

/// Lifecycle service wired to in-memory adapters.
pub type TestService = JobLifecycleService<
    InMemoryJobRequestRepository,
    InMemoryBookingRepository,
    InMemoryFreelancerDirectory,
    RecordingEventSink,
    ManualClock,
>;

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock reading 1 February 2030, 09:00 UTC.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2030, 2, 1, 9, 0, 0)
            .single()
            .expect("valid starting instant");
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

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Service, recorded events and clock for one test.
pub struct Marketplace {
    pub service: Arc<TestService>,
    pub events: RecordingEventSink,
    pub clock: Arc<ManualClock>,
}

/// Builds a freelancer identifier.
#[must_use]
pub fn freelancer(value: u64) -> FreelancerId {
    FreelancerId::new(value).expect("valid freelancer id")
}

/// Builds a published bar staff profile meeting every bar shift requirement.
#[must_use]
pub fn bartender(value: u64) -> FreelancerProfile {
    FreelancerProfile::new(freelancer(value), ServiceKind::Bar)
        .with_years_experience(4)
        .with_phone(PhoneType::OtherSmartphone)
        .with_districts(["EC1V"])
}

/// Provides a marketplace with bartenders 1 to `bartenders` registered.
#[fixture]
pub fn marketplace(#[default(4)] bartenders: u64) -> Marketplace {
    let clock = Arc::new(ManualClock::new());
    let events = RecordingEventSink::new();
    let directory = InMemoryFreelancerDirectory::with_profiles((1..=bartenders).map(bartender));
    let job_requests = InMemoryJobRequestRepository::new();
    let service = JobLifecycleService::new(
        Arc::new(job_requests.clone()),
        Arc::new(InMemoryBookingRepository::new(job_requests)),
        Arc::new(directory),
        Arc::new(events.clone()),
        Arc::clone(&clock),
    );
    Marketplace {
        service: Arc::new(service),
        events,
        clock,
    }
}

/// Bar shift on 14 March 2030 for `freelancers` people, three hours from 20:00.
#[must_use]
pub fn bar_shift(freelancers: u8) -> NewJobRequest {
    NewJobRequest {
        client: ClientId::new(77).expect("valid client"),
        service: ServiceDetails::Bar {
            role: BarRole::Bartender,
        },
        schedule: JobSchedule::new(
            NaiveDate::from_ymd_opt(2030, 3, 14).expect("valid date"),
            NaiveTime::from_hms_opt(20, 0, 0).expect("valid time"),
            3,
        )
        .expect("valid schedule"),
        number_of_freelancers: FreelancerCount::new(freelancers).expect("valid count"),
        pay_per_hour: PayRate::new(
            Decimal::new(1450, 2),
            CurrencyCode::new("GBP").expect("valid currency"),
        )
        .expect("valid pay rate"),
        tips_included: false,
        years_experience: YearsExperience::ThreeYears,
        phone_requirement: PhoneRequirement::AnySmartphone,
        location: JobLocation::new("12 City Road", "EC1V 2NX").expect("valid location"),
        comments: "Private launch party".to_owned(),
    }
}
