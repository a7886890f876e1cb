//! `PostgreSQL` repository implementation for invitations and bookings.
//!
//! Every mutation runs in a transaction that first takes a row lock on the
//! owning job request (`SELECT ... FOR UPDATE`), then loads the roster and
//! applies the domain rules. Concurrent writers on the same job request queue
//! on that lock; writers on other job requests are unaffected.

use super::{
    models::{BookingRow, InvitationRow},
    schema::{bookings, invitations},
};
use crate::booking::{
    domain::{
        Booking, BookingId, BookingOrigin, Invitation, InvitationId, InvitationStatus, JobRoster,
        PersistedBookingData, PersistedInvitationData,
    },
    ports::{BookingRepository, BookingRepositoryError, BookingRepositoryResult},
};
use crate::job::{
    adapters::postgres::schema::job_requests,
    domain::{FreelancerCount, FreelancerId, JobRequestId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by booking adapters.
pub type BookingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed booking repository.
#[derive(Debug, Clone)]
pub struct PostgresBookingRepository {
    pool: BookingPgPool,
}

impl From<diesel::result::Error> for BookingRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl PostgresBookingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BookingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BookingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BookingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BookingRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BookingRepositoryError::persistence)?
    }

    async fn in_job_transaction<F, T>(&self, f: F) -> BookingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BookingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |connection| {
            connection.transaction::<_, BookingRepositoryError, _>(f)
        })
        .await
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert_invitation(&self, invitation: &Invitation) -> BookingRepositoryResult<()> {
        let row = invitation_to_row(invitation)?;
        let job_request = invitation.job_request();
        let freelancer = invitation.freelancer();
        self.in_job_transaction(move |tx| {
            lock_job_request(tx, job_request)?;
            load_roster(tx, job_request)?.ensure_can_invite(freelancer)?;
            diesel::insert_into(invitations::table)
                .values(&row)
                .execute(tx)?;
            Ok(())
        })
        .await
    }

    async fn insert_direct_booking(&self, booking: &Booking) -> BookingRepositoryResult<()> {
        let row = booking_to_row(booking)?;
        let job_request = booking.job_request();
        let freelancer = booking.freelancer();
        self.in_job_transaction(move |tx| {
            lock_job_request(tx, job_request)?;
            load_roster(tx, job_request)?.ensure_can_book_directly(freelancer)?;
            diesel::insert_into(bookings::table).values(&row).execute(tx)?;
            Ok(())
        })
        .await
    }

    async fn accept_invitation(
        &self,
        invitation_id: InvitationId,
        booking: &Booking,
        capacity: FreelancerCount,
    ) -> BookingRepositoryResult<Invitation> {
        let row = booking_to_row(booking)?;
        let pending_booking = booking.clone();
        self.in_job_transaction(move |tx| {
            let job_request = invitation_job_request(tx, invitation_id)?;
            lock_job_request(tx, job_request)?;
            let accepted = load_roster(tx, job_request)?
                .accept(invitation_id, pending_booking, capacity)?
                .ok_or(BookingRepositoryError::InvitationNotFound(invitation_id))?;
            write_resolution(tx, &accepted)?;
            diesel::insert_into(bookings::table).values(&row).execute(tx)?;
            Ok(accepted)
        })
        .await
    }

    async fn decline_invitation(
        &self,
        invitation_id: InvitationId,
        at: DateTime<Utc>,
    ) -> BookingRepositoryResult<Invitation> {
        self.in_job_transaction(move |tx| {
            let job_request = invitation_job_request(tx, invitation_id)?;
            lock_job_request(tx, job_request)?;
            let declined = load_roster(tx, job_request)?
                .decline(invitation_id, at)?
                .ok_or(BookingRepositoryError::InvitationNotFound(invitation_id))?;
            write_resolution(tx, &declined)?;
            Ok(declined)
        })
        .await
    }

    async fn find_invitation(
        &self,
        id: InvitationId,
    ) -> BookingRepositoryResult<Option<Invitation>> {
        self.run_blocking(move |connection| {
            invitations::table
                .filter(invitations::id.eq(id.into_inner()))
                .select(InvitationRow::as_select())
                .first::<InvitationRow>(connection)
                .optional()?
                .map(row_to_invitation)
                .transpose()
        })
        .await
    }

    async fn find_booking(&self, id: BookingId) -> BookingRepositoryResult<Option<Booking>> {
        self.run_blocking(move |connection| {
            bookings::table
                .filter(bookings::id.eq(id.into_inner()))
                .select(BookingRow::as_select())
                .first::<BookingRow>(connection)
                .optional()?
                .map(row_to_booking)
                .transpose()
        })
        .await
    }

    async fn roster(&self, job_request: JobRequestId) -> BookingRepositoryResult<JobRoster> {
        self.run_blocking(move |connection| load_roster(connection, job_request))
            .await
    }

    async fn open_invitations_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> BookingRepositoryResult<Vec<Invitation>> {
        let freelancer_id = id_to_db(freelancer.value())?;
        self.run_blocking(move |connection| {
            invitations::table
                .filter(invitations::freelancer_id.eq(freelancer_id))
                .filter(invitations::status.eq(InvitationStatus::Pending.as_str()))
                .order(invitations::created_at.asc())
                .select(InvitationRow::as_select())
                .load::<InvitationRow>(connection)?
                .into_iter()
                .map(row_to_invitation)
                .collect()
        })
        .await
    }

    async fn bookings_for_freelancer(
        &self,
        freelancer: FreelancerId,
    ) -> BookingRepositoryResult<Vec<Booking>> {
        let freelancer_id = id_to_db(freelancer.value())?;
        self.run_blocking(move |connection| {
            bookings::table
                .filter(bookings::freelancer_id.eq(freelancer_id))
                .order(bookings::created_at.asc())
                .select(BookingRow::as_select())
                .load::<BookingRow>(connection)?
                .into_iter()
                .map(row_to_booking)
                .collect()
        })
        .await
    }
}

fn lock_job_request(
    connection: &mut PgConnection,
    job_request: JobRequestId,
) -> BookingRepositoryResult<()> {
    job_requests::table
        .filter(job_requests::id.eq(id_to_db(job_request.value())?))
        .select(job_requests::id)
        .for_update()
        .get_result::<i64>(connection)
        .optional()?
        .map(|_| ())
        .ok_or(BookingRepositoryError::JobRequestNotFound(job_request))
}

fn invitation_job_request(
    connection: &mut PgConnection,
    invitation_id: InvitationId,
) -> BookingRepositoryResult<JobRequestId> {
    let stored = invitations::table
        .filter(invitations::id.eq(invitation_id.into_inner()))
        .select(invitations::job_request_id)
        .first::<i64>(connection)
        .optional()?
        .ok_or(BookingRepositoryError::InvitationNotFound(invitation_id))?;
    job_request_from_db(stored)
}

fn load_roster(
    connection: &mut PgConnection,
    job_request: JobRequestId,
) -> BookingRepositoryResult<JobRoster> {
    let job_request_id = id_to_db(job_request.value())?;
    let invitation_rows = invitations::table
        .filter(invitations::job_request_id.eq(job_request_id))
        .order(invitations::created_at.asc())
        .select(InvitationRow::as_select())
        .load::<InvitationRow>(connection)?;
    let booking_rows = bookings::table
        .filter(bookings::job_request_id.eq(job_request_id))
        .order(bookings::created_at.asc())
        .select(BookingRow::as_select())
        .load::<BookingRow>(connection)?;
    Ok(JobRoster::from_parts(
        job_request,
        invitation_rows
            .into_iter()
            .map(row_to_invitation)
            .collect::<BookingRepositoryResult<_>>()?,
        booking_rows
            .into_iter()
            .map(row_to_booking)
            .collect::<BookingRepositoryResult<_>>()?,
    ))
}

fn write_resolution(
    connection: &mut PgConnection,
    invitation: &Invitation,
) -> BookingRepositoryResult<()> {
    diesel::update(invitations::table.filter(invitations::id.eq(invitation.id().into_inner())))
        .set((
            invitations::status.eq(invitation.status().as_str()),
            invitations::resolved_at.eq(invitation.resolved_at()),
        ))
        .execute(connection)?;
    Ok(())
}

fn id_to_db(value: u64) -> BookingRepositoryResult<i64> {
    i64::try_from(value).map_err(BookingRepositoryError::persistence)
}

fn job_request_from_db(value: i64) -> BookingRepositoryResult<JobRequestId> {
    let unsigned = u64::try_from(value).map_err(BookingRepositoryError::persistence)?;
    JobRequestId::new(unsigned).map_err(BookingRepositoryError::persistence)
}

fn freelancer_from_db(value: i64) -> BookingRepositoryResult<FreelancerId> {
    let unsigned = u64::try_from(value).map_err(BookingRepositoryError::persistence)?;
    FreelancerId::new(unsigned).map_err(BookingRepositoryError::persistence)
}

pub(crate) fn invitation_to_row(invitation: &Invitation) -> BookingRepositoryResult<InvitationRow> {
    Ok(InvitationRow {
        id: invitation.id().into_inner(),
        job_request_id: id_to_db(invitation.job_request().value())?,
        freelancer_id: id_to_db(invitation.freelancer().value())?,
        status: invitation.status().as_str().to_owned(),
        created_at: invitation.created_at(),
        resolved_at: invitation.resolved_at(),
    })
}

pub(crate) fn row_to_invitation(row: InvitationRow) -> BookingRepositoryResult<Invitation> {
    let status =
        InvitationStatus::try_from(row.status.as_str()).map_err(BookingRepositoryError::persistence)?;
    Ok(Invitation::from_persisted(PersistedInvitationData {
        id: InvitationId::from_uuid(row.id),
        job_request: job_request_from_db(row.job_request_id)?,
        freelancer: freelancer_from_db(row.freelancer_id)?,
        status,
        created_at: row.created_at,
        resolved_at: row.resolved_at,
    }))
}

pub(crate) fn booking_to_row(booking: &Booking) -> BookingRepositoryResult<BookingRow> {
    Ok(BookingRow {
        id: booking.id().into_inner(),
        job_request_id: id_to_db(booking.job_request().value())?,
        freelancer_id: id_to_db(booking.freelancer().value())?,
        invitation_id: booking.origin().invitation().map(InvitationId::into_inner),
        created_at: booking.created_at(),
    })
}

pub(crate) fn row_to_booking(row: BookingRow) -> BookingRepositoryResult<Booking> {
    let origin = row
        .invitation_id
        .map_or(BookingOrigin::Direct, |id| {
            BookingOrigin::Invitation(InvitationId::from_uuid(id))
        });
    Ok(Booking::from_persisted(PersistedBookingData {
        id: BookingId::from_uuid(row.id),
        job_request: job_request_from_db(row.job_request_id)?,
        freelancer: freelancer_from_db(row.freelancer_id)?,
        origin,
        created_at: row.created_at,
    }))
}
