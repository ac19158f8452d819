//! In-process storage engine.
//!
//! Same contract as the PostgreSQL engine; used by tests and by the server
//! when no `DATABASE_URL` is configured. Contents are lost on exit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use facematch_core::SubjectRecord;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::SubjectStore;

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    subjects: Arc<RwLock<HashMap<String, SubjectRecord>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubjectStore for MemoryStorage {
    async fn get_subject(&self, subject_id: &str) -> Result<Option<SubjectRecord>, StorageError> {
        Ok(self.subjects.read().await.get(subject_id).cloned())
    }

    async fn upsert_subject(
        &self,
        subject_id: &str,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<SubjectRecord, StorageError> {
        let record = SubjectRecord::new(subject_id.to_owned(), embeddings, Utc::now());
        // Whole-record replacement under the write lock.
        self.subjects.write().await.insert(subject_id.to_owned(), record.clone());
        Ok(record)
    }

    async fn count_subjects(&self) -> Result<u64, StorageError> {
        Ok(self.subjects.read().await.len() as u64)
    }
}
