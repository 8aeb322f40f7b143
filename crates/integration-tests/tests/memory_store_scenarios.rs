//! Exercises `JobStore::stats` and `count_by_status` end-to-end through the application layer,
//! which the in-crate adapter tests don't cover.

use queue_core::application::{claim_next, complete_op, fail_op, publish};
use queue_core::domain::JobStatus;
use queue_core::port::{ClaimFilter, SystemClock, UuidGenerator};
use queue_core::validation::{RawCompleteInput, RawFailInput, RawPublishInput};
use queue_store_memory::InMemoryJobStore;
use std::collections::HashMap;

fn publish_input(job_type: &str) -> RawPublishInput {
    RawPublishInput {
        job_type: job_type.to_string(),
        payload: HashMap::new(),
        priority: None,
        max_attempts: None,
        scheduled_for: None,
        trace_id: None,
    }
}

#[tokio::test]
async fn stats_reflect_the_queue_across_a_mixed_workload() {
    use queue_core::port::JobStore;

    let store = InMemoryJobStore::default();
    let clock = SystemClock;
    let ids = UuidGenerator;

    let done = publish(&store, &clock, &ids, publish_input("a"))
        .await
        .unwrap();
    let failed = publish(&store, &clock, &ids, publish_input("b"))
        .await
        .unwrap();
    publish(&store, &clock, &ids, publish_input("c")).await.unwrap();

    claim_next(&store, "w", &ClaimFilter::any()).await.unwrap();
    complete_op(
        &store,
        RawCompleteInput {
            job_id: done.job_id,
            result: None,
        },
    )
    .await
    .unwrap();

    claim_next(&store, "w", &ClaimFilter::any()).await.unwrap();
    fail_op(
        &store,
        RawFailInput {
            job_id: failed.job_id,
            error: "boom".to_string(),
        },
    )
    .await
    .unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2, "one untouched job plus the requeued failure");
    assert_eq!(store.count_by_status(JobStatus::Processing).await.unwrap(), 0);
}

#[tokio::test]
async fn claiming_with_no_eligible_jobs_returns_none_not_an_error() {
    let store = InMemoryJobStore::default();
    let claimed = claim_next(&store, "idle-worker", &ClaimFilter::any())
        .await
        .unwrap();
    assert!(claimed.is_none());
}
