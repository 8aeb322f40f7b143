// Publish Use Case (spec section 4.7)

use crate::domain::{JobEnvelope, JobStatus};
use crate::error::{QueueError, Result};
use crate::port::{Clock, IdGenerator, JobStore};
use crate::validation::RawPublishInput;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response returned to the publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub job_id: Uuid,
    pub trace_id: String,
}

/// Validate `input`, assemble an envelope, hand it to the adapter, and revalidate the result.
pub async fn execute(
    store: &dyn JobStore,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    input: RawPublishInput,
) -> Result<PublishOutcome> {
    let input = input.validate()?;

    let job_id = ids.new_job_id();
    let trace_id = input.trace_id.unwrap_or_else(|| ids.new_trace_id());
    let now = clock.now();
    let scheduled_for = input.scheduled_for.unwrap_or(now);

    let envelope = JobEnvelope {
        job_id,
        trace_id: trace_id.clone(),
        job_type: input.job_type,
        payload: input.payload,
        status: JobStatus::Pending,
        priority: input.priority,
        attempts: 0,
        max_attempts: input.max_attempts,
        created_at: now,
        updated_at: now,
        scheduled_for,
        started_at: None,
        completed_at: None,
        failed_at: None,
        error: None,
        worker_id: None,
    };

    let stored = store
        .insert(envelope)
        .await
        .map_err(QueueError::Storage)?;
    crate::validation::revalidate_envelope(&stored).map_err(QueueError::Validation)?;

    Ok(PublishOutcome {
        job_id: stored.job_id,
        trace_id: stored.trace_id,
    })
}

#[cfg(test)]
#[path = "publish_test.rs"]
mod publish_test;
