// Fail Use Case (spec section 4.7)
//
// Known discrepancy (spec section 9, "fail_op surface semantics"): the adapter may have
// requeued the job to `pending` rather than terminally failing it (spec section 4.3), but
// `ResultEnvelope.status` (spec section 3.2) is typed to only ever hold a *terminal* status
// (completed or failed) — the data model gives no non-terminal variant to report through this
// return shape. We therefore preserve the source behavior spec section 9 explicitly sanctions
// keeping "for compatibility": `fail_op` always reports `status: Failed`, regardless of whether
// the job actually returned to `pending` for another attempt. Callers that need to know whether
// a job is truly terminal must re-fetch the envelope (e.g. via a subsequent `claim_next` or
// `find_by_id`) and check `JobEnvelope.status` directly.

use crate::domain::{JobStatus, ResultEnvelope};
use crate::error::{QueueError, Result};
use crate::port::JobStore;
use crate::validation::RawFailInput;

pub async fn execute(store: &dyn JobStore, input: RawFailInput) -> Result<Option<ResultEnvelope>> {
    let input = input.validate()?;

    let updated = store
        .fail(input.job_id, &input.error)
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
        status: JobStatus::Failed,
        result: None,
        error: envelope.error.clone(),
        completed_at: envelope.failed_at.unwrap_or(envelope.updated_at),
    }))
}
