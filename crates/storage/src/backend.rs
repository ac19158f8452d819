//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use facematch_core::SubjectRecord;

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::pg_storage::PgStorage;
use crate::traits::SubjectStore;

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Postgres(s) => <PgStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    Postgres(PgStorage),
}

impl StorageBackend {
    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgStorage::new(database_url).await?))
    }

    /// Short engine name for logs and readiness output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

#[async_trait]
impl SubjectStore for StorageBackend {
    async fn get_subject(&self, subject_id: &str) -> Result<Option<SubjectRecord>, StorageError> {
        dispatch!(self, SubjectStore, get_subject(subject_id))
    }

    async fn upsert_subject(
        &self,
        subject_id: &str,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<SubjectRecord, StorageError> {
        dispatch!(self, SubjectStore, upsert_subject(subject_id, embeddings))
    }

    async fn count_subjects(&self) -> Result<u64, StorageError> {
        dispatch!(self, SubjectStore, count_subjects())
    }
}
