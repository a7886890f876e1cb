//! Service layer for invitation and booking proposals.

mod guard;

pub use guard::{AcceptedInvitation, BookingGuard, BookingGuardError, BookingGuardResult};
