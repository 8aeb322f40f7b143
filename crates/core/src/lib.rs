// Durable Priority Job Queue - Core Domain Logic & Ports
// NO infrastructure dependencies (hexagonal architecture): storage adapters live in their own
// crates and depend on this one, never the reverse.

pub mod application;
pub mod domain;
pub mod error;
pub mod port;
pub mod validation;

pub use error::{QueueError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
