//! SubjectStore implementation for PgStorage.

use super::*;

use crate::codec::encode_embedding;
use crate::traits::SubjectStore;
use async_trait::async_trait;
use facematch_core::ValidationError;

#[async_trait]
impl SubjectStore for PgStorage {
    async fn get_subject(&self, subject_id: &str) -> Result<Option<SubjectRecord>, StorageError> {
        let sql = format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE subject_id = $1");
        let row = sqlx::query(&sql)
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_subject).transpose()
    }

    async fn upsert_subject(
        &self,
        subject_id: &str,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<SubjectRecord, StorageError> {
        let dimension_len = embeddings.first().map_or(0, Vec::len);
        let dimension = i32::try_from(dimension_len).map_err(|_| {
            ValidationError::Other(format!("dimension {dimension_len} does not fit the schema"))
        })?;
        let blobs: Vec<Vec<u8>> = embeddings.iter().map(|e| encode_embedding(e)).collect();

        // Single statement: the old set is replaced wholesale or not at all.
        let updated_at: DateTime<Utc> = sqlx::query_scalar(
            "INSERT INTO subjects (subject_id, dimension, embeddings, created_at, updated_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             ON CONFLICT (subject_id) DO UPDATE
                SET dimension = EXCLUDED.dimension,
                    embeddings = EXCLUDED.embeddings,
                    updated_at = EXCLUDED.updated_at
             RETURNING updated_at",
        )
        .bind(subject_id)
        .bind(dimension)
        .bind(blobs)
        .fetch_one(&self.pool)
        .await?;

        Ok(SubjectRecord::new(subject_id.to_owned(), embeddings, updated_at))
    }

    async fn count_subjects(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
