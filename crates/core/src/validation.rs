// Boundary validation (spec section 4.1).
//
// Every public operation that accepts caller-supplied data validates it against an explicit
// schema before use; every envelope an adapter returns is re-validated before being surfaced to
// callers (see `application::revalidate_envelope`). Unknown fields are ignored; type and range
// violations fail immediately.

use crate::domain::{JobEnvelope, JobStatus, Payload};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

const MAX_TYPE_LEN: usize = 128;
const MAX_TRACE_ID_LEN: usize = 256;
const MAX_PAYLOAD_DEPTH: usize = 32;

/// Raw caller input to `publish`. Validated into a [`PublishInput`].
#[derive(Debug, Clone)]
pub struct RawPublishInput {
    pub job_type: String,
    pub payload: Payload,
    pub priority: Option<i64>,
    pub max_attempts: Option<i32>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub trace_id: Option<String>,
}

/// A [`RawPublishInput`] that has passed validation.
#[derive(Debug, Clone)]
pub struct PublishInput {
    pub job_type: String,
    pub payload: Payload,
    pub priority: i64,
    pub max_attempts: i32,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub trace_id: Option<String>,
}

impl RawPublishInput {
    /// Parse this raw input into a validated value, or a structured [`ValidationError`].
    pub fn validate(self) -> Result<PublishInput, ValidationError> {
        if self.job_type.is_empty() {
            return Err(ValidationError::new("type", "must not be empty"));
        }
        if self.job_type.len() > MAX_TYPE_LEN {
            return Err(ValidationError::new(
                "type",
                format!("must be at most {MAX_TYPE_LEN} chars"),
            ));
        }
        if let Some(trace_id) = &self.trace_id {
            if trace_id.is_empty() {
                return Err(ValidationError::new("trace_id", "must not be empty"));
            }
            if trace_id.len() > MAX_TRACE_ID_LEN {
                return Err(ValidationError::new(
                    "trace_id",
                    format!("must be at most {MAX_TRACE_ID_LEN} chars"),
                ));
            }
        }
        if let Some(max_attempts) = self.max_attempts {
            if max_attempts < 1 {
                return Err(ValidationError::new(
                    "max_attempts",
                    "must be a positive integer",
                ));
            }
        }
        for value in self.payload.values() {
            check_depth(value, 0)?;
        }

        Ok(PublishInput {
            job_type: self.job_type,
            payload: self.payload,
            priority: self.priority.unwrap_or(0),
            max_attempts: self.max_attempts.unwrap_or(3),
            scheduled_for: self.scheduled_for,
            trace_id: self.trace_id,
        })
    }
}

fn check_depth(value: &Value, depth: usize) -> Result<(), ValidationError> {
    if depth > MAX_PAYLOAD_DEPTH {
        return Err(ValidationError::new(
            "payload",
            format!("nested deeper than {MAX_PAYLOAD_DEPTH} levels"),
        ));
    }
    match value {
        Value::Array(items) => {
            for item in items {
                check_depth(item, depth + 1)?;
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                check_depth(v, depth + 1)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Raw caller input to `complete`. Validated into a [`CompleteInput`].
#[derive(Debug, Clone)]
pub struct RawCompleteInput {
    pub job_id: Uuid,
    pub result: Option<Payload>,
}

#[derive(Debug, Clone)]
pub struct CompleteInput {
    pub job_id: Uuid,
    pub result: Option<Payload>,
}

impl RawCompleteInput {
    pub fn validate(self) -> Result<CompleteInput, ValidationError> {
        Ok(CompleteInput {
            job_id: self.job_id,
            result: self.result,
        })
    }
}

/// Raw caller input to `fail`. Validated into a [`FailInput`].
#[derive(Debug, Clone)]
pub struct RawFailInput {
    pub job_id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct FailInput {
    pub job_id: Uuid,
    pub error: String,
}

impl RawFailInput {
    pub fn validate(self) -> Result<FailInput, ValidationError> {
        if self.error.is_empty() {
            return Err(ValidationError::new("error", "must not be empty"));
        }
        Ok(FailInput {
            job_id: self.job_id,
            error: self.error,
        })
    }
}

/// Re-validate an envelope returned by an adapter before surfacing it to callers. This catches
/// storage drift (spec section 9) and is cheap; it is not meant to reject adapters, only to
/// assert the cross-field invariants from spec section 3.1 hold.
pub fn revalidate_envelope(envelope: &JobEnvelope) -> Result<(), ValidationError> {
    if envelope.attempts > envelope.max_attempts && envelope.status.is_terminal() {
        return Err(ValidationError::new(
            "attempts",
            "exceeds max_attempts on a terminal job",
        ));
    }
    if envelope.scheduled_for < envelope.created_at {
        return Err(ValidationError::new(
            "scheduled_for",
            "precedes created_at",
        ));
    }
    if envelope.status == JobStatus::Processing
        && (envelope.worker_id.is_none() || envelope.started_at.is_none())
    {
        return Err(ValidationError::new(
            "worker_id",
            "processing job missing worker_id or started_at",
        ));
    }
    if envelope.status == JobStatus::Completed && envelope.completed_at.is_none() {
        return Err(ValidationError::new(
            "completed_at",
            "completed job missing completed_at",
        ));
    }
    if envelope.job_type.is_empty() {
        return Err(ValidationError::new("type", "must not be empty"));
    }
    if envelope.trace_id.is_empty() {
        return Err(ValidationError::new("trace_id", "must not be empty"));
    }
    Ok(())
}
