// Claim Use Case (spec section 4.7)

use crate::domain::JobEnvelope;
use crate::error::{QueueError, Result};
use crate::port::{ClaimFilter, JobStore};

/// Ask the adapter for the next eligible job and revalidate it before returning it to the caller.
pub async fn execute(
    store: &dyn JobStore,
    worker_name: &str,
    job_types: &ClaimFilter,
) -> Result<Option<JobEnvelope>> {
    let claimed = store
        .claim(worker_name, job_types)
        .await
        .map_err(QueueError::Storage)?;

    if let Some(envelope) = &claimed {
        crate::validation::revalidate_envelope(envelope).map_err(QueueError::Validation)?;
    }

    Ok(claimed)
}
