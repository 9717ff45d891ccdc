//! On-disk artifacts passed between pipeline stages.
//!
//! # Storage layout
//!
//! ```text
//! <data-dir>/
//!   data.json     (normalized directory; mode 0600, holds contact details)
//!   access.json   (computed access model; mode 0600)
//! ```
//!
//! Every function takes the data directory explicitly; nothing here reads
//! the environment.
//!
//! ## Write protocol
//!
//! 1. Serialize to pretty JSON with a trailing newline.
//! 2. SHA-256 the new content and the existing file (if any).
//! 3. Skip if identical → [`WriteResult::Unchanged`].
//! 4. Write `<file>.tmp`, `chmod 0600`, rename over the target.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{io_err, StoreError};
use crate::types::{AccessModel, Directory};

pub const DATA_FILE: &str = "data.json";
pub const ACCESS_FILE: &str = "access.json";

// ---------------------------------------------------------------------------
// 1. Paths
// ---------------------------------------------------------------------------

/// `<data-dir>/data.json`
pub fn data_path_at(dir: &Path) -> PathBuf {
    dir.join(DATA_FILE)
}

/// `<data-dir>/access.json`
pub fn access_path_at(dir: &Path) -> PathBuf {
    dir.join(ACCESS_FILE)
}

// ---------------------------------------------------------------------------
// 2. Write result
// ---------------------------------------------------------------------------

/// Outcome of an artifact write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// Content changed or the file did not exist.
    Written { path: PathBuf },
    /// Content on disk already matched; the file was left untouched.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Unchanged { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Generic JSON helpers
// ---------------------------------------------------------------------------

/// Canonical text form of an artifact: pretty JSON plus trailing newline.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Read and parse a JSON artifact.
///
/// Returns [`StoreError::NotFound`] when absent, [`StoreError::Parse`] with
/// the path when malformed.
pub fn read_json_at<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(io_err(path, err)),
    };
    serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Current text of an artifact, or an empty string if it does not exist.
pub fn read_text_or_empty(path: &Path) -> Result<String, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content.replace("\r\n", "\n")),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

/// Serialize `value` and write it to `path` atomically, unless the file
/// already holds exactly that content.
pub fn write_json_at<T: Serialize>(path: &Path, value: &T) -> Result<WriteResult, StoreError> {
    let content = to_json(value)?;
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    write_if_changed(path, &content, &tmp)
}

fn write_if_changed(path: &Path, content: &str, tmp: &Path) -> Result<WriteResult, StoreError> {
    let existing = read_text_or_empty(path)?;
    if path.exists() && digest(&existing) == digest(content) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }

    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    set_file_permissions(tmp)?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

fn digest(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

// ---------------------------------------------------------------------------
// 4. Typed artifacts
// ---------------------------------------------------------------------------

pub fn load_directory_at(dir: &Path) -> Result<Directory, StoreError> {
    read_json_at(&data_path_at(dir))
}

pub fn save_directory_at(dir: &Path, directory: &Directory) -> Result<WriteResult, StoreError> {
    write_json_at(&data_path_at(dir), directory)
}

pub fn load_access_at(dir: &Path) -> Result<AccessModel, StoreError> {
    read_json_at(&access_path_at(dir))
}

pub fn save_access_at(dir: &Path, access: &AccessModel) -> Result<WriteResult, StoreError> {
    write_json_at(&access_path_at(dir), access)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
