//! Raw upload archiving.
//!
//! Every received image is kept on disk under the subject's directory. The
//! archive is best effort: a failed write is logged and the request carries on.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

#[allow(clippy::unwrap_used, reason = "static pattern is known to compile")]
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

const FALLBACK_FILENAME: &str = "upload";
const MAX_FILENAME_LEN: usize = 128;
/// Longer encoded subject ids are replaced by a name-based UUID.
const MAX_SUBJECT_DIR_LEN: usize = 128;
/// Never produced by [`subject_dir_name`]'s escaping, so hashed names cannot
/// collide with escaped ones.
const HASHED_SUBJECT_PREFIX: char = '~';

/// Reduces a client-supplied name to a single safe path component.
///
/// Directory parts are dropped, runs of unsafe characters become `_`, and
/// leading dots are removed so the result can never be `.`/`..` or hidden.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let trimmed = replaced.trim_start_matches(['.', '_']).trim_end_matches('_');
    let mut clean: String = trimmed.chars().take(MAX_FILENAME_LEN).collect();
    if clean.is_empty() {
        clean.push_str(FALLBACK_FILENAME);
    }
    clean
}

/// Maps a subject id to a directory name, one to one.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_XX`
/// (uppercase hex). Since `_` is itself escaped, distinct ids never share a
/// directory, and `.` or `/` can never reach the path.
#[must_use]
pub fn subject_dir_name(subject_id: &str) -> String {
    let mut encoded = String::with_capacity(subject_id.len());
    for byte in subject_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "_{byte:02X}");
        }
    }
    if encoded.len() > MAX_SUBJECT_DIR_LEN {
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, subject_id.as_bytes());
        return format!("{HASHED_SUBJECT_PREFIX}{}", id.simple());
    }
    encoded
}

#[derive(Debug, Clone)]
pub struct UploadArchive {
    root: PathBuf,
}

impl UploadArchive {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Writes `bytes` to `<root>/<subject dir>/<uuid>_<name>` and returns the
    /// path. See [`subject_dir_name`] for the directory.
    pub async fn store(
        &self,
        subject_id: &str,
        name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, std::io::Error> {
        let dir = self.root.join(subject_dir_name(subject_id));
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(name)));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Like [`store`](Self::store) but only logs failures.
    pub async fn archive(&self, subject_id: &str, name: &str, bytes: &[u8]) {
        match self.store(subject_id, name, bytes).await {
            Ok(path) => tracing::debug!(subject_id, path = %path.display(), "upload archived"),
            Err(e) => tracing::warn!(subject_id, name, "failed to archive upload: {e}"),
        }
    }
}
