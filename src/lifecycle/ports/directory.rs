//! Freelancer matching port.

use crate::job::domain::{FreelancerId, JobRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for freelancer directory lookups.
pub type FreelancerDirectoryResult<T> = Result<T, FreelancerDirectoryError>;

/// Source of freelancers eligible for a job request.
#[async_trait]
pub trait FreelancerDirectory: Send + Sync {
    /// Returns the freelancers eligible to be invited to `job_request`.
    ///
    /// # Errors
    ///
    /// Returns [`FreelancerDirectoryError`] when the directory cannot be
    /// queried.
    async fn find_matching(
        &self,
        job_request: &JobRequest,
    ) -> FreelancerDirectoryResult<Vec<FreelancerId>>;
}

/// Errors returned by freelancer directory implementations.
#[derive(Debug, Clone, Error)]
pub enum FreelancerDirectoryError {
    /// The directory could not be reached or queried.
    #[error("freelancer directory unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl FreelancerDirectoryError {
    /// Wraps a lookup failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
