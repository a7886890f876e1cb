//! Port contracts for job request persistence.

pub mod repository;

pub use repository::{JobRequestRepository, JobRequestRepositoryError, JobRequestRepositoryResult};
