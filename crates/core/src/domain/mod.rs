// Domain Layer - the envelope model, free of storage and transport concerns.

pub mod envelope;

pub use envelope::{JobEnvelope, JobStatus, Payload, Priority, ResultEnvelope};
