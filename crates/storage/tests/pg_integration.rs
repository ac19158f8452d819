//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p facematch-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use facematch_storage::{PgStorage, Repository, StorageBackend, StorageError, SubjectStore};
use uuid::Uuid;

const DIMENSION: usize = 16;

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::new(&url).await.expect("Failed to connect to PostgreSQL")
}

async fn create_pg_repository() -> Repository {
    Repository::new(StorageBackend::Postgres(create_pg_storage().await), DIMENSION)
}

fn unique_id() -> String {
    format!("test-{}", Uuid::new_v4())
}

fn embedding(seed: f32) -> Vec<f32> {
    (0..DIMENSION).map(|i| (i as f32 * 0.31 + seed).sin()).collect()
}

#[tokio::test]
#[ignore]
async fn pg_upsert_and_get_round_trips_exactly() {
    let repo = create_pg_repository().await;
    let id = unique_id();
    let set = vec![embedding(0.1), vec![f32::MIN_POSITIVE; DIMENSION], embedding(-3.7)];

    repo.upsert(&id, set.clone()).await.unwrap();
    let fetched = repo.get(&id).await.unwrap().unwrap();

    let bits = |s: &[Vec<f32>]| {
        s.iter().flat_map(|v| v.iter().map(|f| f.to_bits())).collect::<Vec<_>>()
    };
    assert_eq!(bits(&fetched.embeddings), bits(&set));
}

#[tokio::test]
#[ignore]
async fn pg_re_enrollment_replaces_set() {
    let repo = create_pg_repository().await;
    let id = unique_id();

    repo.upsert(&id, vec![embedding(1.0), embedding(2.0)]).await.unwrap();
    repo.upsert(&id, vec![embedding(3.0)]).await.unwrap();

    let fetched = repo.get(&id).await.unwrap().unwrap();
    assert_eq!(fetched.embeddings, vec![embedding(3.0)]);
}

#[tokio::test]
#[ignore]
async fn pg_get_missing_subject() {
    let storage = create_pg_storage().await;
    assert!(storage.get_subject(&unique_id()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn pg_rejected_write_leaves_row_untouched() {
    let repo = create_pg_repository().await;
    let id = unique_id();
    repo.upsert(&id, vec![embedding(0.5)]).await.unwrap();

    let err = repo.upsert(&id, vec![vec![1.0; DIMENSION - 1]]).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));

    let fetched = repo.get(&id).await.unwrap().unwrap();
    assert_eq!(fetched.embeddings, vec![embedding(0.5)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn pg_concurrent_upserts_leave_one_input() {
    let repo = create_pg_repository().await;
    let id = unique_id();
    let inputs: Vec<Vec<Vec<f32>>> =
        (0..8).map(|w| (0..=w).map(|k| embedding((w * 10 + k) as f32)).collect()).collect();

    let handles: Vec<_> = inputs
        .iter()
        .cloned()
        .map(|set| {
            let repo = repo.clone();
            let id = id.clone();
            tokio::spawn(async move { repo.upsert(&id, set).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let fetched = repo.get(&id).await.unwrap().unwrap();
    assert_eq!(inputs.iter().filter(|s| **s == fetched.embeddings).count(), 1);
}
