//! Shared fixtures for the `PostgreSQL` adapter tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use rstest::fixture;
use rust_decimal::Decimal;
use shiftwork::booking::adapters::postgres::PostgresBookingRepository;
use shiftwork::job::{
    adapters::postgres::PostgresJobRequestRepository,
    domain::{
        BarRole, ClientId, CurrencyCode, FreelancerCount, FreelancerId, JobLocation, JobRequest,
        JobSchedule, NewJobRequest, PayRate, PhoneRequirement, ServiceDetails, YearsExperience,
    },
    ports::JobRequestRepository,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Schema applied to the template database.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_booking_lifecycle/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "shiftwork_test_template";

/// Builds the runtime used to drive the embedded cluster.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Database cloned from the template, dropped with the value.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TemporaryDatabase {
    /// Returns the database connection URL.
    pub fn url(&self) -> String {
        self.cluster.database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Both repositories over one fresh database.
pub struct PreparedDatabase {
    pub job_requests: PostgresJobRequestRepository,
    pub bookings: PostgresBookingRepository,
    _database: TemporaryDatabase,
}

fn apply_schema(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)
}

/// Clones the migrated template into a new database and connects both
/// repositories to it.
///
/// The pool holds several connections so that writers on one job request
/// genuinely contend for its row lock.
pub fn prepare_database(cluster: PostgresCluster) -> Result<PreparedDatabase, BoxError> {
    cluster.ensure_template_exists(TEMPLATE_DB, apply_schema)?;
    let name = format!("shiftwork_{}", Uuid::new_v4().simple());
    cluster.create_database_from_template(&name, TEMPLATE_DB)?;
    let database = TemporaryDatabase { cluster, name };

    let pool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(database.url()))
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(PreparedDatabase {
        job_requests: PostgresJobRequestRepository::new(pool.clone()),
        bookings: PostgresBookingRepository::new(pool),
        _database: database,
    })
}

/// Provides a fresh database on the shared cluster.
#[fixture]
pub fn database(postgres_cluster: PostgresCluster) -> Result<PreparedDatabase, BoxError> {
    prepare_database(postgres_cluster)
}

/// Builds a freelancer identifier.
pub fn freelancer(value: u64) -> FreelancerId {
    FreelancerId::new(value).expect("valid freelancer id")
}

/// Cocktail bar shift on 1 March 2030 from 18:00 for `freelancers` people.
pub fn bar_shift(freelancers: u8) -> NewJobRequest {
    NewJobRequest {
        client: ClientId::new(31).expect("valid client"),
        service: ServiceDetails::Bar {
            role: BarRole::Mixologist,
        },
        schedule: JobSchedule::new(
            NaiveDate::from_ymd_opt(2030, 3, 1).expect("valid date"),
            NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
            5,
        )
        .expect("valid schedule"),
        number_of_freelancers: FreelancerCount::new(freelancers).expect("valid count"),
        pay_per_hour: PayRate::new(
            Decimal::new(1250, 2),
            CurrencyCode::new("GBP").expect("valid currency"),
        )
        .expect("positive pay rate"),
        tips_included: false,
        years_experience: YearsExperience::OneYear,
        phone_requirement: PhoneRequirement::AnySmartphone,
        location: JobLocation::new("10 Downing Street", "SW1A 2AA").expect("valid location"),
        comments: String::new(),
    }
}

/// Allocates an id and stores a new job request in `Checkout`.
pub async fn stored_job_request(
    repository: &PostgresJobRequestRepository,
    freelancers: u8,
) -> Result<JobRequest, BoxError> {
    let id = repository.next_id().await?;
    let job_request = JobRequest::new(id, bar_shift(freelancers), &Utc, &DefaultClock)?;
    repository.store(&job_request).await?;
    Ok(job_request)
}
