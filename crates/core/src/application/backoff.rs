// Retry backoff arithmetic (spec section 4.3 / glossary: "Backoff").
//
// Linear backoff keyed by the attempt count just completed: `attempts * 30 seconds`. Computed
// here for the in-memory adapter and restated as SQL in the durable adapter (spec section 4.5
// requires the durable adapter compute it in the update statement, not the client, but both must
// agree on the formula).

use chrono::Duration;

const BACKOFF_UNIT_SECS: i64 = 30;

pub fn backoff_delay(attempts_after_claim: i32) -> Duration {
    Duration::seconds(BACKOFF_UNIT_SECS * attempts_after_claim as i64)
}
