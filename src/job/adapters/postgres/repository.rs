//! `PostgreSQL` repository implementation for job request storage.

use super::{
    models::{JobRequestRow, NewJobRequestRow},
    schema::job_requests,
};
use crate::job::{
    domain::{
        ClientId, CurrencyCode, FreelancerCount, JobLocation, JobRequest, JobRequestId,
        JobSchedule, JobStatus, PayRate, PersistedJobRequestData, PhoneRequirement,
        ServiceDetails, YearsExperience,
    },
    ports::{JobRequestRepository, JobRequestRepositoryError, JobRequestRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rust_decimal::Decimal;
use std::str::FromStr;

/// `PostgreSQL` connection pool type used by job request adapters.
pub type JobPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed job request repository.
#[derive(Debug, Clone)]
pub struct PostgresJobRequestRepository {
    pool: JobPgPool,
}

#[derive(Debug, QueryableByName)]
struct SequenceValue {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    id: i64,
}

impl PostgresJobRequestRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: JobPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> JobRequestRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> JobRequestRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(JobRequestRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(JobRequestRepositoryError::persistence)?
    }
}

#[async_trait]
impl JobRequestRepository for PostgresJobRequestRepository {
    async fn next_id(&self) -> JobRequestRepositoryResult<JobRequestId> {
        self.run_blocking(|connection| {
            let next = diesel::sql_query("SELECT nextval('job_requests_id_seq') AS id")
                .get_result::<SequenceValue>(connection)
                .map_err(JobRequestRepositoryError::persistence)?;
            job_request_id_from_db(next.id)
        })
        .await
    }

    async fn store(&self, job_request: &JobRequest) -> JobRequestRepositoryResult<()> {
        let id = job_request.id();
        let new_row = to_new_row(job_request)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(job_requests::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRequestRepositoryError::DuplicateJobRequest(id)
                    }
                    _ => JobRequestRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_status(
        &self,
        job_request: &JobRequest,
        expected: JobStatus,
    ) -> JobRequestRepositoryResult<()> {
        let id = job_request.id();
        let db_id = job_request_id_to_db(id)?;
        let new_status = job_request.status().as_str();
        let updated_at = job_request.updated_at();
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                job_requests::table
                    .filter(job_requests::id.eq(db_id))
                    .filter(job_requests::status.eq(expected.as_str())),
            )
            .set((
                job_requests::status.eq(new_status),
                job_requests::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(JobRequestRepositoryError::persistence)?;
            if affected > 0 {
                return Ok(());
            }

            let actual = job_requests::table
                .filter(job_requests::id.eq(db_id))
                .select(job_requests::status)
                .first::<String>(connection)
                .optional()
                .map_err(JobRequestRepositoryError::persistence)?
                .ok_or(JobRequestRepositoryError::NotFound(id))?;
            let actual_status = JobStatus::try_from(actual.as_str())
                .map_err(JobRequestRepositoryError::persistence)?;
            Err(JobRequestRepositoryError::StatusConflict {
                job_request: id,
                expected,
                actual: actual_status,
            })
        })
        .await
    }

    async fn update(&self, job_request: &JobRequest) -> JobRequestRepositoryResult<()> {
        let id = job_request.id();
        let row = to_new_row(job_request)?;
        self.run_blocking(move |connection| {
            let affected = diesel::update(job_requests::table.filter(job_requests::id.eq(row.id)))
                .set(&row)
                .execute(connection)
                .map_err(JobRequestRepositoryError::persistence)?;
            if affected == 0 {
                return Err(JobRequestRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: JobRequestId,
    ) -> JobRequestRepositoryResult<Option<JobRequest>> {
        let db_id = job_request_id_to_db(id)?;
        self.run_blocking(move |connection| {
            let row = job_requests::table
                .filter(job_requests::id.eq(db_id))
                .select(JobRequestRow::as_select())
                .first::<JobRequestRow>(connection)
                .optional()
                .map_err(JobRequestRepositoryError::persistence)?;
            row.map(row_to_job_request).transpose()
        })
        .await
    }

    async fn find_for_client(
        &self,
        client: ClientId,
    ) -> JobRequestRepositoryResult<Vec<JobRequest>> {
        let client_id =
            i64::try_from(client.value()).map_err(JobRequestRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let rows = job_requests::table
                .filter(job_requests::client_id.eq(client_id))
                .order((job_requests::submitted_at.desc(), job_requests::id.desc()))
                .select(JobRequestRow::as_select())
                .load::<JobRequestRow>(connection)
                .map_err(JobRequestRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job_request).collect()
        })
        .await
    }

    async fn find_needing_completion(
        &self,
        now: DateTime<Utc>,
    ) -> JobRequestRepositoryResult<Vec<JobRequest>> {
        self.run_blocking(move |connection| {
            let rows = job_requests::table
                .filter(job_requests::status.eq(JobStatus::Confirmed.as_str()))
                .filter(job_requests::end_datetime.lt(now))
                .order(job_requests::id.asc())
                .select(JobRequestRow::as_select())
                .load::<JobRequestRow>(connection)
                .map_err(JobRequestRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job_request).collect()
        })
        .await
    }
}

fn job_request_id_to_db(id: JobRequestId) -> JobRequestRepositoryResult<i64> {
    i64::try_from(id.value()).map_err(JobRequestRepositoryError::persistence)
}

fn job_request_id_from_db(value: i64) -> JobRequestRepositoryResult<JobRequestId> {
    let unsigned = u64::try_from(value).map_err(JobRequestRepositoryError::persistence)?;
    JobRequestId::new(unsigned).map_err(JobRequestRepositoryError::persistence)
}

pub(crate) fn to_new_row(job_request: &JobRequest) -> JobRequestRepositoryResult<NewJobRequestRow> {
    let service = serde_json::to_value(job_request.service())
        .map_err(JobRequestRepositoryError::persistence)?;
    let schedule = job_request.schedule();
    let duration_hours = i16::try_from(schedule.duration_hours())
        .map_err(JobRequestRepositoryError::persistence)?;
    let years_experience = i16::try_from(job_request.years_experience().years())
        .map_err(JobRequestRepositoryError::persistence)?;
    let client_id = i64::try_from(job_request.client().value())
        .map_err(JobRequestRepositoryError::persistence)?;
    let location = job_request.location();

    Ok(NewJobRequestRow {
        id: job_request_id_to_db(job_request.id())?,
        client_id,
        service,
        schedule_date: schedule.date(),
        start_time: schedule.start_time(),
        duration_hours,
        end_datetime: job_request.end_datetime(),
        number_of_freelancers: i16::from(job_request.number_of_freelancers().value()),
        pay_per_hour: job_request.pay_per_hour().amount().to_string(),
        currency: job_request.pay_per_hour().currency().as_str().to_owned(),
        tips_included: job_request.tips_included(),
        years_experience,
        phone_requirement: job_request.phone_requirement().as_str().to_owned(),
        address_line1: location.address_line1().to_owned(),
        address_line2: location.address_line2().map(str::to_owned),
        postcode: location.postcode().to_owned(),
        comments: job_request.comments().to_owned(),
        status: job_request.status().as_str().to_owned(),
        submitted_at: job_request.submitted_at(),
        updated_at: job_request.updated_at(),
    })
}

pub(crate) fn row_to_job_request(row: JobRequestRow) -> JobRequestRepositoryResult<JobRequest> {
    let JobRequestRow {
        id,
        client_id,
        service: persisted_service,
        schedule_date,
        start_time,
        duration_hours,
        end_datetime,
        number_of_freelancers: persisted_count,
        pay_per_hour: persisted_amount,
        currency: persisted_currency,
        tips_included,
        years_experience: persisted_years,
        phone_requirement: persisted_phone,
        address_line1,
        address_line2,
        postcode,
        comments,
        status: persisted_status,
        submitted_at,
        updated_at,
    } = row;

    let client = u64::try_from(client_id)
        .map_err(JobRequestRepositoryError::persistence)
        .and_then(|value| ClientId::new(value).map_err(JobRequestRepositoryError::persistence))?;
    let service = serde_json::from_value::<ServiceDetails>(persisted_service)
        .map_err(JobRequestRepositoryError::persistence)?;
    let duration = u16::try_from(duration_hours).map_err(JobRequestRepositoryError::persistence)?;
    let schedule = JobSchedule::new(schedule_date, start_time, duration)
        .map_err(JobRequestRepositoryError::persistence)?;
    let number_of_freelancers = u8::try_from(persisted_count)
        .map_err(JobRequestRepositoryError::persistence)
        .and_then(|value| {
            FreelancerCount::new(value).map_err(JobRequestRepositoryError::persistence)
        })?;
    let amount =
        Decimal::from_str(&persisted_amount).map_err(JobRequestRepositoryError::persistence)?;
    let currency = CurrencyCode::new(persisted_currency).map_err(JobRequestRepositoryError::persistence)?;
    let pay_per_hour =
        PayRate::new(amount, currency).map_err(JobRequestRepositoryError::persistence)?;
    let years_experience = u16::try_from(persisted_years)
        .map_err(JobRequestRepositoryError::persistence)
        .and_then(|value| {
            YearsExperience::try_from(value).map_err(JobRequestRepositoryError::persistence)
        })?;
    let phone_requirement = PhoneRequirement::try_from(persisted_phone.as_str())
        .map_err(JobRequestRepositoryError::persistence)?;
    let mut location =
        JobLocation::new(address_line1, postcode).map_err(JobRequestRepositoryError::persistence)?;
    if let Some(line2) = address_line2 {
        location = location.with_address_line2(line2);
    }
    let status =
        JobStatus::try_from(persisted_status.as_str()).map_err(JobRequestRepositoryError::persistence)?;

    Ok(JobRequest::from_persisted(PersistedJobRequestData {
        id: job_request_id_from_db(id)?,
        client,
        service,
        schedule,
        end_datetime,
        number_of_freelancers,
        pay_per_hour,
        tips_included,
        years_experience,
        phone_requirement,
        location,
        comments,
        status,
        submitted_at,
        updated_at,
    }))
}
