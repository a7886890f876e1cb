//! In-memory adapters for job request persistence.

mod job_request;

pub use job_request::InMemoryJobRequestRepository;
