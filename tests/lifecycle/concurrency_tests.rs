//! Guard behaviour under concurrent acceptance and proposals.

use super::helpers::{Marketplace, bar_shift, freelancer, marketplace};
use rstest::rstest;
use shiftwork::{
    booking::domain::{BookingDomainError, InvitationId},
    job::domain::JobRequestId,
    lifecycle::{
        domain::LifecycleEventKind,
        services::{AdminAction, AdminDecision, JobLifecycleError},
    },
};
use std::sync::Arc;
use tokio::sync::Barrier;

async fn open_job(market: &Marketplace, freelancers: u8) -> (JobRequestId, Vec<InvitationId>) {
    let job_request = market
        .service
        .create_job_request(bar_shift(freelancers))
        .await
        .expect("create job request");
    let outcome = market
        .service
        .open_job(job_request.id())
        .await
        .expect("open job request");
    let invitations = outcome.invited.iter().map(|invitation| invitation.id()).collect();
    (job_request.id(), invitations)
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_slot_goes_to_exactly_one_freelancer(marketplace: Marketplace) {
    let market = marketplace;
    let (job_request, invitations) = open_job(&market, 1).await;
    let barrier = Arc::new(Barrier::new(invitations.len()));

    let mut handles = Vec::new();
    for (invitation, value) in invitations.into_iter().zip(1_u64..) {
        let service = Arc::clone(&market.service);
        let start = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            start.wait().await;
            service.accept_invitation(invitation, freelancer(value)).await
        }));
    }

    let mut accepted = 0_usize;
    let mut full = 0_usize;
    for handle in handles {
        match handle.await.expect("acceptance task") {
            Ok(_) => accepted += 1,
            Err(JobLifecycleError::Booking(BookingDomainError::AlreadyFull { .. })) => full += 1,
            Err(other) => panic!("unexpected acceptance error: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(full, 3);
    assert_eq!(market.events.count(LifecycleEventKind::BookingCreated), 1);
    let roster = market.service.roster(job_request).await.expect("roster");
    assert_eq!(roster.bookings().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_invitations_for_one_freelancer_create_one(
    #[with(0)] marketplace: Marketplace,
) {
    let market = marketplace;
    let (job_request, invitations) = open_job(&market, 1).await;
    assert!(invitations.is_empty());
    let barrier = Arc::new(Barrier::new(8));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&market.service);
        let start = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            start.wait().await;
            service
                .confirm_or_invite_decision(AdminDecision {
                    job_request,
                    freelancer: freelancer(9),
                    action: AdminAction::Invite,
                })
                .await
        }));
    }

    let mut created = 0_usize;
    let mut duplicates = 0_usize;
    for handle in handles {
        match handle.await.expect("invitation task") {
            Ok(_) => created += 1,
            Err(JobLifecycleError::Booking(BookingDomainError::DuplicateRequest { .. })) => {
                duplicates += 1;
            }
            Err(other) => panic!("unexpected invitation error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
    let roster = market.service.roster(job_request).await.expect("roster");
    assert_eq!(roster.invitations().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn acceptances_on_different_jobs_do_not_interfere(marketplace: Marketplace) {
    let market = marketplace;
    let (first_job, first_invitations) = open_job(&market, 1).await;
    let (second_job, second_invitations) = open_job(&market, 1).await;

    let first = {
        let service = Arc::clone(&market.service);
        let invitation = *first_invitations.first().expect("first job invitation");
        tokio::spawn(async move { service.accept_invitation(invitation, freelancer(1)).await })
    };
    let second = {
        let service = Arc::clone(&market.service);
        let invitation = *second_invitations.first().expect("second job invitation");
        tokio::spawn(async move { service.accept_invitation(invitation, freelancer(1)).await })
    };

    first.await.expect("join").expect("first job acceptance");
    second.await.expect("join").expect("second job acceptance");
    let bookings = market
        .service
        .bookings_for_freelancer(freelancer(1))
        .await
        .expect("list bookings");
    let mut jobs: Vec<JobRequestId> = bookings.iter().map(|booking| booking.job_request()).collect();
    jobs.sort_unstable();
    assert_eq!(jobs, vec![first_job, second_job]);
}
