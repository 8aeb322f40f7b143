// Application Layer - the stateless queue operations (spec section 4.7)

pub mod backoff;
pub mod claim;
pub mod complete;
pub mod fail;
pub mod publish;

pub use backoff::backoff_delay;
pub use publish::PublishOutcome;

use crate::domain::{JobEnvelope, ResultEnvelope};
use crate::error::Result;
use crate::port::{Clock, ClaimFilter, IdGenerator, JobStore};
use crate::validation::{RawCompleteInput, RawFailInput, RawPublishInput};

/// Validate, generate ids, fill defaults, insert, revalidate. See [`publish::execute`].
pub async fn publish(
    store: &dyn JobStore,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    input: RawPublishInput,
) -> Result<PublishOutcome> {
    publish::execute(store, clock, ids, input).await
}

/// Claim the next eligible job, revalidating it if present. See [`claim::execute`].
pub async fn claim_next(
    store: &dyn JobStore,
    worker_name: &str,
    job_types: &ClaimFilter,
) -> Result<Option<JobEnvelope>> {
    claim::execute(store, worker_name, job_types).await
}

/// Validate, complete, build the [`ResultEnvelope`]. See [`complete::execute`].
pub async fn complete_op(
    store: &dyn JobStore,
    input: RawCompleteInput,
) -> Result<Option<ResultEnvelope>> {
    complete::execute(store, input).await
}

/// Validate, fail (or requeue), build the [`ResultEnvelope`]. See [`fail::execute`].
pub async fn fail_op(store: &dyn JobStore, input: RawFailInput) -> Result<Option<ResultEnvelope>> {
    fail::execute(store, input).await
}
