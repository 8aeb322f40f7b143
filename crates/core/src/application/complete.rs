// Complete Use Case (spec section 4.7)

use crate::domain::{JobStatus, ResultEnvelope};
use crate::error::{QueueError, Result};
use crate::port::JobStore;
use crate::validation::RawCompleteInput;

/// Validate `input`, ask the adapter to complete the job, and build the [`ResultEnvelope`] the
/// caller sees. Returns `None` if the job was missing or not in `processing` (spec section 7:
/// precondition failures are silent, not errors) — e.g. completing an already-completed job is a
/// no-op.
pub async fn execute(
    store: &dyn JobStore,
    input: RawCompleteInput,
) -> Result<Option<ResultEnvelope>> {
    let input = input.validate()?;

    let updated = store
        .complete(input.job_id, input.result.clone())
        .await
        .map_err(QueueError::Storage)?;

    let Some(envelope) = updated else {
        return Ok(None);
    };
    crate::validation::revalidate_envelope(&envelope).map_err(QueueError::Validation)?;

    Ok(Some(ResultEnvelope {
        job_id: envelope.job_id,
        trace_id: envelope.trace_id,
        job_type: envelope.job_type,
        status: JobStatus::Completed,
        result: input.result,
        error: None,
        completed_at: envelope.completed_at.unwrap_or(envelope.updated_at),
    }))
}
