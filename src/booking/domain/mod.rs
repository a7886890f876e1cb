//! Domain model for invitations and bookings.
//!
//! The guard rules live on [`JobRoster`]; they are pure and evaluated by the
//! repository adapters inside each job request's critical section.

mod booking;
mod error;
mod ids;
mod invitation;
mod roster;

pub use booking::{Booking, BookingOrigin, PersistedBookingData};
pub use error::{BookingDomainError, ParseInvitationStatusError, RequestKind};
pub use ids::{BookingId, InvitationId};
pub use invitation::{Invitation, InvitationStatus, PersistedInvitationData};
pub use roster::JobRoster;
