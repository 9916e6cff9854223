//! Postgres (pgvector) adapters.

pub mod connection;
pub mod passage_store;

pub use connection::{create_pool, pool_from_config, verify_connection, ConnectionError, PoolConfig};
pub use passage_store::PgPassageStore;
