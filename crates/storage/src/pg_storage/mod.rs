//! PostgreSQL storage backend using sqlx.

mod subjects;

use chrono::{DateTime, Utc};
use facematch_core::{
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
    SubjectRecord,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::codec::decode_embedding;
use crate::error::StorageError;

use super::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, running migrations first.
    pub async fn from_pool(pool: PgPool) -> Result<Self, StorageError> {
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

pub(crate) const SUBJECT_COLUMNS: &str = "subject_id, dimension, embeddings, updated_at";

pub(crate) fn row_to_subject(row: &sqlx::postgres::PgRow) -> Result<SubjectRecord, StorageError> {
    let subject_id: String = row.try_get("subject_id")?;
    let dimension: i32 = row.try_get("dimension")?;
    let blobs: Vec<Vec<u8>> = row.try_get("embeddings")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let dimension = usize::try_from(dimension).map_err(|e| StorageError::DataCorruption {
        context: format!("negative dimension {dimension} for subject {subject_id}"),
        source: Box::new(e),
    })?;
    let embeddings = blobs
        .iter()
        .enumerate()
        .map(|(index, blob)| {
            decode_embedding(blob, dimension).map_err(|e| StorageError::DataCorruption {
                context: format!("embedding {index} of subject {subject_id}"),
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SubjectRecord::new(subject_id, embeddings, updated_at))
}
