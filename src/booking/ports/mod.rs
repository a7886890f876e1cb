//! Port definitions for invitation and booking persistence.

mod repository;

pub use repository::{BookingRepository, BookingRepositoryError, BookingRepositoryResult};
