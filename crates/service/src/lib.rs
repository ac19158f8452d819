//! Service layer for facematch
//!
//! Sits between the HTTP/CLI front ends and the repository/extractor pair:
//! enrollment, verification, matching and upload archiving.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod enrollment_service;
mod error;
mod matcher;
mod subject_service;
mod types;
mod uploads;
mod verification_service;

pub use enrollment_service::EnrollmentService;
pub use error::ServiceError;
pub use matcher::Matcher;
pub use subject_service::SubjectService;
pub use types::{EnrollmentReport, ImageFailure, ImageUpload, SubjectSummary};
pub use uploads::{UploadArchive, sanitize_filename, subject_dir_name};
pub use verification_service::VerificationService;
