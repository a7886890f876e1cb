//! Diesel row models for invitations and bookings.

use super::schema::{bookings, invitations};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Invitation record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvitationRow {
    /// Invitation identifier.
    pub id: Uuid,
    /// Job request identifier.
    pub job_request_id: i64,
    /// Freelancer identifier.
    pub freelancer_id: i64,
    /// Status code.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Answer timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Booking record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    /// Booking identifier.
    pub id: Uuid,
    /// Job request identifier.
    pub job_request_id: i64,
    /// Freelancer identifier.
    pub freelancer_id: i64,
    /// Accepted invitation, absent for direct bookings.
    pub invitation_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
