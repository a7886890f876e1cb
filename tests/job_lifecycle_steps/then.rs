//! Then steps for job lifecycle BDD scenarios.

use super::world::{JobLifecycleWorld, run_async};
use shiftwork::{
    booking::domain::BookingDomainError,
    job::domain::{FreelancerId, JobDomainError, JobStatus},
    lifecycle::{
        domain::{LifecycleEvent, LifecycleEventKind},
        services::JobLifecycleError,
    },
};
use rstest_bdd_macros::then;

#[then(r#"the job request status is "{status}""#)]
fn job_request_status_is(world: &JobLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected_status = JobStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let id = world.job_request()?.id();
    let stored = run_async(world.service.find_job_request(id))?
        .ok_or_else(|| eyre::eyre!("job request {id} not found"))?;

    eyre::ensure!(
        stored.status() == expected_status,
        "expected status {}, found {}",
        expected_status.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then("{count:usize} invitations were created")]
fn invitations_created(world: &JobLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let published = world.events.count(LifecycleEventKind::InvitationCreated);
    eyre::ensure!(
        published == count,
        "expected {count} invitation events, found {published}"
    );
    let roster = run_async(world.service.roster(world.job_request()?.id()))?;
    eyre::ensure!(
        roster.invitations().len() == count,
        "expected {count} stored invitations, found {}",
        roster.invitations().len()
    );
    Ok(())
}

#[then("bartender {value:u64} is booked")]
fn bartender_is_booked(world: &JobLifecycleWorld, value: u64) -> Result<(), eyre::Report> {
    let freelancer = FreelancerId::new(value)?;
    let roster = run_async(world.service.roster(world.job_request()?.id()))?;
    eyre::ensure!(
        roster.booked_freelancers() == vec![freelancer],
        "expected only bartender {value} to be booked, found {:?}",
        roster.booked_freelancers()
    );
    Ok(())
}

#[then("the last action fails because the job is full")]
fn last_action_fails_full(world: &JobLifecycleWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last action to fail"))?;
    if !matches!(
        error,
        JobLifecycleError::Booking(BookingDomainError::AlreadyFull { .. })
    ) {
        return Err(eyre::eyre!("expected AlreadyFull error, got {error:?}"));
    }
    Ok(())
}

#[then("the last action fails with an invalid transition error")]
fn last_action_fails_invalid_transition(world: &JobLifecycleWorld) -> Result<(), eyre::Report> {
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last action to fail"))?;
    if !matches!(
        error,
        JobLifecycleError::Job(JobDomainError::InvalidTransition { .. })
    ) {
        return Err(eyre::eyre!("expected InvalidTransition error, got {error:?}"));
    }
    Ok(())
}

#[then("exactly one completion was published for bartender {value:u64}")]
fn one_completion_published(world: &JobLifecycleWorld, value: u64) -> Result<(), eyre::Report> {
    let freelancer = FreelancerId::new(value)?;
    let expected = LifecycleEvent::JobCompleted {
        job_request: world.job_request()?.id(),
        booked_freelancers: vec![freelancer],
    };
    let completions: Vec<LifecycleEvent> = world
        .events
        .events()
        .into_iter()
        .filter(|event| event.kind() == LifecycleEventKind::JobCompleted)
        .collect();
    eyre::ensure!(
        completions == vec![expected],
        "unexpected completion events: {completions:?}"
    );
    Ok(())
}
