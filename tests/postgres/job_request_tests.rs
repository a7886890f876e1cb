//! `PostgreSQL` tests for job request storage and status writes.

use crate::postgres::helpers::{BoxError, PreparedDatabase, database, stored_job_request};
use chrono::{TimeDelta, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use shiftwork::job::{
    domain::{JobStatus, JobTrigger},
    ports::{JobRequestRepository, JobRequestRepositoryError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identifiers_come_from_the_sequence(
    database: Result<PreparedDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;

    let first = stored_job_request(&db.job_requests, 2).await?;
    let second = stored_job_request(&db.job_requests, 2).await?;

    assert!(second.id().value() > first.id().value());
    assert_eq!(first.id().reference_number(), "JR00001");
    let found = db
        .job_requests
        .find_by_id(second.id())
        .await?
        .expect("stored job request is found");
    assert_eq!(found.status(), JobStatus::Checkout);
    assert_eq!(found.end_datetime(), second.end_datetime());
    assert_eq!(found.pay_per_hour(), second.pay_per_hour());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_an_identifier_twice_is_a_duplicate(
    database: Result<PreparedDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let job_request = stored_job_request(&db.job_requests, 1).await?;

    let result = db.job_requests.store(&job_request).await;

    assert!(matches!(
        result,
        Err(JobRequestRepositoryError::DuplicateJobRequest(id)) if id == job_request.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_status_write_reports_the_stored_status(
    database: Result<PreparedDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let stored = stored_job_request(&db.job_requests, 1).await?;
    let mut opener = stored.clone();
    let mut canceller = stored.clone();
    opener.fire(JobTrigger::Open, &DefaultClock)?;
    canceller.fire(JobTrigger::Cancel, &DefaultClock)?;

    db.job_requests
        .update_status(&opener, JobStatus::Checkout)
        .await?;
    let result = db
        .job_requests
        .update_status(&canceller, JobStatus::Checkout)
        .await;

    assert!(matches!(
        result,
        Err(JobRequestRepositoryError::StatusConflict {
            expected: JobStatus::Checkout,
            actual: JobStatus::Open,
            ..
        })
    ));
    let found = db
        .job_requests
        .find_by_id(stored.id())
        .await?
        .expect("job request exists");
    assert_eq!(found.status(), JobStatus::Open);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_finished_confirmed_jobs_need_completion(
    database: Result<PreparedDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = database?;
    let mut confirmed = stored_job_request(&db.job_requests, 1).await?;
    let open = stored_job_request(&db.job_requests, 1).await?;
    for (trigger, expected) in [
        (JobTrigger::Open, JobStatus::Checkout),
        (JobTrigger::Confirm, JobStatus::Open),
    ] {
        confirmed.fire(trigger, &DefaultClock)?;
        db.job_requests.update_status(&confirmed, expected).await?;
    }
    let mut opened = open.clone();
    opened.fire(JobTrigger::Open, &DefaultClock)?;
    db.job_requests
        .update_status(&opened, JobStatus::Checkout)
        .await?;

    let before_end = confirmed.end_datetime() - TimeDelta::minutes(1);
    let after_end = Utc
        .with_ymd_and_hms(2030, 3, 2, 0, 0, 0)
        .single()
        .expect("valid instant");

    assert!(
        db.job_requests
            .find_needing_completion(before_end)
            .await?
            .is_empty()
    );
    let due = db.job_requests.find_needing_completion(after_end).await?;
    let due_ids: Vec<_> = due.iter().map(|job_request| job_request.id()).collect();
    assert_eq!(due_ids, vec![confirmed.id()]);
    Ok(())
}
