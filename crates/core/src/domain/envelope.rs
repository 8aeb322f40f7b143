// Job Envelope Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Job status (see the state machine documented on [`JobStatus`] transitions in `application`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl JobStatus {
    /// Terminal states are sinks: no further transitions occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Opaque, structured job payload. Persisted verbatim; never interpreted by the core.
pub type Payload = HashMap<String, Value>;

/// Priority: higher claims first. Default 0.
pub type Priority = i64;

/// The canonical record for one unit of work (spec section 3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEnvelope {
    pub job_id: Uuid,
    pub trace_id: String,
    pub job_type: String,
    pub payload: Payload,
    pub status: JobStatus,
    pub priority: Priority,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub scheduled_for: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub worker_id: Option<String>,
}

impl JobEnvelope {
    /// Whether this job is eligible for claim at `now` given an optional type filter.
    /// Mirrors the predicate evaluated by the durable adapter's claim query (spec section 4.4).
    pub fn is_eligible(&self, now: DateTime<Utc>, job_types: &[String]) -> bool {
        self.status == JobStatus::Pending
            && self.scheduled_for <= now
            && (job_types.is_empty() || job_types.iter().any(|t| t == &self.job_type))
    }
}

/// Derived view returned from complete/fail operations (spec section 3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub job_id: Uuid,
    pub trace_id: String,
    pub job_type: String,
    pub status: JobStatus,
    pub result: Option<HashMap<String, Value>>,
    pub error: Option<String>,
    pub completed_at: DateTime<Utc>,
}
