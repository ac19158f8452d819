//! Core types and matching rules for facematch
//!
//! This crate contains the subject record, input validation, the cosine
//! similarity decision procedure and runtime settings shared by all other crates.

mod constants;
mod env_config;
mod error;
mod settings;
mod similarity;
mod subject;

pub use constants::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use settings::Settings;
pub use similarity::{MatchOutcome, cosine_similarity, decide};
pub use subject::{SubjectRecord, validate_embedding, validate_embeddings, validate_subject_id};
