use std::sync::Arc;

use facematch_storage::Repository;

use crate::{ServiceError, SubjectSummary};

/// Read-only views over enrolled subjects.
pub struct SubjectService {
    repository: Arc<Repository>,
}

impl SubjectService {
    #[must_use]
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    pub async fn summary(&self, subject_id: &str) -> Result<Option<SubjectSummary>, ServiceError> {
        let record = self.repository.get(subject_id).await?;
        Ok(record.map(|r| SubjectSummary {
            embeddings: r.embeddings.len(),
            dimension: r.dimension(),
            subject_id: r.subject_id,
            updated_at: r.updated_at,
        }))
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.repository.count().await?)
    }

    #[must_use]
    pub fn backend_kind(&self) -> &'static str {
        self.repository.backend().kind()
    }
}
