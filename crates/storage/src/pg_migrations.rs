//! PostgreSQL schema migrations for facematch storage.

use sqlx::PgPool;

/// Run all PostgreSQL migrations.
///
/// One row per subject, point lookups on the primary key only. Each embedding
/// is one `BYTEA` element holding little-endian `f32` values.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            subject_id TEXT PRIMARY KEY,
            dimension INTEGER NOT NULL CHECK (dimension > 0),
            embeddings BYTEA[] NOT NULL CHECK (cardinality(embeddings) > 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_subjects_updated ON subjects (updated_at DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
