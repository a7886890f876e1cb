//! In-memory adapters for invitations and bookings.

mod booking;

pub use booking::InMemoryBookingRepository;
