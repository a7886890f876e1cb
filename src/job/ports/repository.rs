//! Repository port for job request persistence and lookup.

use crate::job::domain::{ClientId, JobRequest, JobRequestId, JobStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for job request repository operations.
pub type JobRequestRepositoryResult<T> = Result<T, JobRequestRepositoryError>;

/// Job request persistence contract.
#[async_trait]
pub trait JobRequestRepository: Send + Sync {
    /// Allocates a fresh job request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobRequestRepositoryError::Persistence`] when the identifier
    /// sequence cannot be advanced.
    async fn next_id(&self) -> JobRequestRepositoryResult<JobRequestId>;

    /// Stores a new job request.
    ///
    /// # Errors
    ///
    /// Returns [`JobRequestRepositoryError::DuplicateJobRequest`] when the
    /// identifier already exists.
    async fn store(&self, job_request: &JobRequest) -> JobRequestRepositoryResult<()>;

    /// Writes the status (and update timestamp) of `job_request`, provided the
    /// stored status is still `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`JobRequestRepositoryError::NotFound`] when the job request
    /// does not exist, or [`JobRequestRepositoryError::StatusConflict`] when
    /// another writer moved it away from `expected` first.
    async fn update_status(
        &self,
        job_request: &JobRequest,
        expected: JobStatus,
    ) -> JobRequestRepositoryResult<()>;

    /// Replaces every field of an existing job request.
    ///
    /// # Errors
    ///
    /// Returns [`JobRequestRepositoryError::NotFound`] when the job request
    /// does not exist.
    async fn update(&self, job_request: &JobRequest) -> JobRequestRepositoryResult<()>;

    /// Finds a job request by identifier.
    ///
    /// Returns `None` when the job request does not exist.
    async fn find_by_id(&self, id: JobRequestId)
    -> JobRequestRepositoryResult<Option<JobRequest>>;

    /// Returns the job requests placed by `client`, newest first.
    async fn find_for_client(&self, client: ClientId)
    -> JobRequestRepositoryResult<Vec<JobRequest>>;

    /// Returns confirmed job requests whose end timestamp is before `now`.
    async fn find_needing_completion(
        &self,
        now: DateTime<Utc>,
    ) -> JobRequestRepositoryResult<Vec<JobRequest>>;
}

/// Errors returned by job request repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRequestRepositoryError {
    /// A job request with the same identifier already exists.
    #[error("duplicate job request: {0}")]
    DuplicateJobRequest(JobRequestId),

    /// The job request was not found.
    #[error("job request not found: {0}")]
    NotFound(JobRequestId),

    /// The stored status changed since the job request was read.
    #[error("job request {job_request} is {actual}, expected {expected}")]
    StatusConflict {
        /// Job request being written.
        job_request: JobRequestId,
        /// Status the writer read.
        expected: JobStatus,
        /// Status found in storage.
        actual: JobStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRequestRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
