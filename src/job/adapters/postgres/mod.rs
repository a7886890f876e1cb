//! `PostgreSQL` adapters for job request persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{JobPgPool, PostgresJobRequestRepository};

#[cfg(test)]
pub(crate) use repository::{row_to_job_request, to_new_row};
#[cfg(test)]
pub(crate) use models::{JobRequestRow, NewJobRequestRow};
