//! In-memory repository for job requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::job::{
    domain::{ClientId, JobRequest, JobRequestId, JobStatus},
    ports::{JobRequestRepository, JobRequestRepositoryError, JobRequestRepositoryResult},
};

/// Thread-safe in-memory job request repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRequestRepository {
    state: Arc<RwLock<InMemoryJobState>>,
}

#[derive(Debug, Default)]
struct InMemoryJobState {
    last_id: u64,
    job_requests: HashMap<JobRequestId, JobRequest>,
}

impl InMemoryJobRequestRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a job request with `id` has been stored.
    pub(crate) fn contains(&self, id: JobRequestId) -> JobRequestRepositoryResult<bool> {
        Ok(self.read()?.job_requests.contains_key(&id))
    }

    fn read(&self) -> JobRequestRepositoryResult<RwLockReadGuard<'_, InMemoryJobState>> {
        self.state.read().map_err(|err| {
            JobRequestRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> JobRequestRepositoryResult<RwLockWriteGuard<'_, InMemoryJobState>> {
        self.state.write().map_err(|err| {
            JobRequestRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl JobRequestRepository for InMemoryJobRequestRepository {
    async fn next_id(&self) -> JobRequestRepositoryResult<JobRequestId> {
        let mut state = self.write()?;
        let candidate = state.last_id.saturating_add(1);
        let id = JobRequestId::new(candidate).map_err(JobRequestRepositoryError::persistence)?;
        state.last_id = candidate;
        Ok(id)
    }

    async fn store(&self, job_request: &JobRequest) -> JobRequestRepositoryResult<()> {
        let mut state = self.write()?;
        let id = job_request.id();
        if state.job_requests.contains_key(&id) {
            return Err(JobRequestRepositoryError::DuplicateJobRequest(id));
        }
        state.last_id = state.last_id.max(id.value());
        state.job_requests.insert(id, job_request.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        job_request: &JobRequest,
        expected: JobStatus,
    ) -> JobRequestRepositoryResult<()> {
        let mut state = self.write()?;
        let id = job_request.id();
        let stored = state
            .job_requests
            .get_mut(&id)
            .ok_or(JobRequestRepositoryError::NotFound(id))?;
        if stored.status() != expected {
            return Err(JobRequestRepositoryError::StatusConflict {
                job_request: id,
                expected,
                actual: stored.status(),
            });
        }
        *stored = job_request.clone();
        Ok(())
    }

    async fn update(&self, job_request: &JobRequest) -> JobRequestRepositoryResult<()> {
        let mut state = self.write()?;
        let id = job_request.id();
        let stored = state
            .job_requests
            .get_mut(&id)
            .ok_or(JobRequestRepositoryError::NotFound(id))?;
        *stored = job_request.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: JobRequestId,
    ) -> JobRequestRepositoryResult<Option<JobRequest>> {
        let state = self.read()?;
        Ok(state.job_requests.get(&id).cloned())
    }

    async fn find_for_client(
        &self,
        client: ClientId,
    ) -> JobRequestRepositoryResult<Vec<JobRequest>> {
        let state = self.read()?;
        let mut found: Vec<JobRequest> = state
            .job_requests
            .values()
            .filter(|job_request| job_request.client() == client)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.submitted_at()
                .cmp(&a.submitted_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(found)
    }

    async fn find_needing_completion(
        &self,
        now: DateTime<Utc>,
    ) -> JobRequestRepositoryResult<Vec<JobRequest>> {
        let state = self.read()?;
        let mut found: Vec<JobRequest> = state
            .job_requests
            .values()
            .filter(|job_request| {
                job_request.status() == JobStatus::Confirmed && job_request.has_finished(now)
            })
            .cloned()
            .collect();
        found.sort_by_key(JobRequest::id);
        Ok(found)
    }
}
