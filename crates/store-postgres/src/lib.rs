// PostgreSQL durable adapter for the job queue core (spec section 4.4).

mod connection;
mod error_mapping;
mod migration;
mod store;

pub use connection::{create_pool, PostgresStoreConfig};
pub use migration::run_migrations;
pub use store::PostgresJobStore;
