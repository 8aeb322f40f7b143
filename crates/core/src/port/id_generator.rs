// ID Generator Port (for deterministic testing)

use uuid::Uuid;

/// Generates job ids and trace ids. Allows deterministic ids in tests.
pub trait IdGenerator: Send + Sync {
    fn new_job_id(&self) -> Uuid;
    fn new_trace_id(&self) -> String;
}

/// UUID v4 generator (production).
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_job_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn new_trace_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
