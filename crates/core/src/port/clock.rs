// Clock Port (for deterministic testing, spec section 9)

use chrono::{DateTime, Utc};

/// Time source. Allows tests to inject a fixed or controllable clock instead of the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source (production).
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
