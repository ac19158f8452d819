//! Process exit statuses.
//!
//! `1` and `2` are verdicts, never faults. Faults use the `sysexits.h` codes
//! so a script can tell "not this person" apart from "could not decide".

use std::io;

use facematch_core::ConfigError;
use facematch_service::ServiceError;
use facematch_storage::StorageError;

/// Verification ran and the face did not match.
pub(crate) const NO_MATCH: u8 = 1;
/// Nothing is enrolled under the requested subject id.
pub(crate) const SUBJECT_NOT_FOUND: u8 = 2;

/// Invalid subject id, payload or embedding (`EX_USAGE`).
pub(crate) const INVALID_INPUT: u8 = 64;
/// The extractor refused every image (`EX_DATAERR`).
pub(crate) const REJECTED_IMAGE: u8 = 65;
/// An image file could not be read (`EX_NOINPUT`).
pub(crate) const UNREADABLE_INPUT: u8 = 66;
/// Storage or extractor unreachable; retrying may succeed (`EX_UNAVAILABLE`).
pub(crate) const UNAVAILABLE: u8 = 69;
/// Any other fault on our side (`EX_SOFTWARE`).
pub(crate) const INTERNAL: u8 = 70;
/// Bad or missing configuration (`EX_CONFIG`).
pub(crate) const CONFIG: u8 = 78;

/// Picks the status for a failed command from the first typed error in the
/// chain.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ServiceError>() {
            return service_code(e);
        }
        if let Some(e) = cause.downcast_ref::<StorageError>() {
            return storage_code(e);
        }
        if cause.is::<ConfigError>() {
            return CONFIG;
        }
        if let Some(e) = cause.downcast_ref::<io::Error>() {
            return io_code(e);
        }
    }
    INTERNAL
}

fn service_code(err: &ServiceError) -> u8 {
    if err.is_transient() {
        UNAVAILABLE
    } else if err.is_client_error() {
        match err {
            ServiceError::Validation(_) | ServiceError::Storage(_) => INVALID_INPUT,
            ServiceError::Extraction(_) | ServiceError::NoUsableImages(_) => REJECTED_IMAGE,
        }
    } else if let ServiceError::Storage(e) = err {
        storage_code(e)
    } else {
        INTERNAL
    }
}

fn io_code(err: &io::Error) -> u8 {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => UNREADABLE_INPUT,
        _ => INTERNAL,
    }
}

fn storage_code(err: &StorageError) -> u8 {
    match err {
        StorageError::Validation(_) => INVALID_INPUT,
        StorageError::DataCorruption { .. } => INTERNAL,
        StorageError::Database(_) | StorageError::Migration(_) => UNAVAILABLE,
    }
}
