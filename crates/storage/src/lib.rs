//! Storage layer for facematch
//!
//! Durable mapping from subject id to embedding set. PostgreSQL in production,
//! an in-process engine with the same contract for tests and ephemeral runs.

mod backend;
pub mod codec;
pub mod error;
mod memory;
mod pg_migrations;
mod pg_storage;
mod repository;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_storage::PgStorage;
pub use repository::Repository;
pub use traits::SubjectStore;
