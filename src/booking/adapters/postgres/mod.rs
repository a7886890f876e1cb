//! `PostgreSQL` adapters for invitation and booking persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BookingPgPool, PostgresBookingRepository};

#[cfg(test)]
pub(crate) use models::InvitationRow;
#[cfg(test)]
pub(crate) use repository::{booking_to_row, invitation_to_row, row_to_booking, row_to_invitation};
