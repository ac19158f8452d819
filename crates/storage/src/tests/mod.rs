//! Test utilities and module declarations for storage tests.

use crate::{Repository, StorageBackend};


pub const TEST_DIMENSION: usize = 8;

pub fn create_test_repository() -> Repository {
    Repository::new(StorageBackend::new_memory(), TEST_DIMENSION)
}

/// Deterministic, non-degenerate embedding distinguished by `seed`.
pub fn create_test_embedding(seed: f32) -> Vec<f32> {
    (0..TEST_DIMENSION).map(|i| (i as f32).mul_add(0.5, seed).cos()).collect()
}

pub fn create_test_set(seeds: &[f32]) -> Vec<Vec<f32>> {
    seeds.iter().map(|s| create_test_embedding(*s)).collect()
}
