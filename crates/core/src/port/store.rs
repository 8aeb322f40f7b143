// Adapter Contract (spec section 4.2)

use crate::domain::{JobEnvelope, JobStatus};
use crate::error::{ConfigurationError, StorageError};
use async_trait::async_trait;
use uuid::Uuid;

/// A type filter for `claim`. Empty means no filter.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter(pub Vec<String>);

impl ClaimFilter {
    pub fn any() -> Self {
        Self(Vec::new())
    }

    pub fn types(types: Vec<String>) -> Self {
        Self(types)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Per-status job counts, a read-only convenience surfaced by every adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}

/// The narrow storage interface shared by the durable and in-memory adapters (spec section 4.2).
///
/// `claim`, `complete`, and `fail` are the only methods whose semantics differ between backends
/// (persistence and the atomicity mechanism); every other method is expected to behave
/// identically in both.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Idempotent. Prepares backing storage (creates relations, indexes).
    async fn initialize(&self) -> Result<(), ConfigurationError>;

    /// Releases all resources. After close, further calls may fail.
    async fn close(&self) -> Result<(), StorageError>;

    /// Persists a fully-formed envelope; returns the stored envelope (possibly with defaults
    /// applied by storage).
    async fn insert(&self, envelope: JobEnvelope) -> Result<JobEnvelope, StorageError>;

    /// Atomically transitions one eligible pending job to processing and returns it, or `None`
    /// if no eligible job exists. `job_types` empty means no type filter.
    async fn claim(
        &self,
        worker_name: &str,
        job_types: &ClaimFilter,
    ) -> Result<Option<JobEnvelope>, StorageError>;

    /// Transitions a processing job to completed; returns the updated envelope, or `None` if the
    /// job is missing or not in processing (spec section 7: precondition failures are silent).
    async fn complete(
        &self,
        job_id: Uuid,
        result: Option<crate::domain::Payload>,
    ) -> Result<Option<JobEnvelope>, StorageError>;

    /// Either requeues (if `attempts < max_attempts` after the claim-increment) or terminally
    /// fails the job; returns the updated envelope, or `None` if the job is missing or not in
    /// processing.
    async fn fail(&self, job_id: Uuid, error: &str) -> Result<Option<JobEnvelope>, StorageError>;

    /// Direct lookup by id. Not part of the minimal six-operation contract in spec section 4.2,
    /// but every adapter needs it internally and it is useful for tests and read paths.
    async fn find_by_id(&self, job_id: Uuid) -> Result<Option<JobEnvelope>, StorageError>;

    /// Count jobs by status, for observability and test assertions.
    async fn count_by_status(&self, status: JobStatus) -> Result<i64, StorageError>;

    /// Aggregate counts across all statuses.
    async fn stats(&self) -> Result<QueueStats, StorageError> {
        Ok(QueueStats {
            pending: self.count_by_status(JobStatus::Pending).await?,
            processing: self.count_by_status(JobStatus::Processing).await?,
            completed: self.count_by_status(JobStatus::Completed).await?,
            failed: self.count_by_status(JobStatus::Failed).await?,
        })
    }
}
