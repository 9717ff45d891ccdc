//! Unified diff of a freshly computed access model against `access.json`.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use teamsync_core::{store, AccessModel};

use crate::SyncError;

/// Rendered difference between the persisted and the new access model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Compare `access` with the current `<data-dir>/access.json`.
///
/// Returns `None` when nothing would change. A missing file diffs against
/// empty content. No files are written.
pub fn diff_access(data_dir: &Path, access: &AccessModel) -> Result<Option<AccessDiff>, SyncError> {
    let path = store::access_path_at(data_dir);
    let existing = store::read_text_or_empty(&path)?;
    let rendered = store::to_json(access)?;
    if existing == rendered {
        return Ok(None);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| store::ACCESS_FILE.to_string());
    let old_header = format!("a/{name}");
    let new_header = format!("b/{name}");
    let unified = TextDiff::from_lines(&existing, &rendered)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(Some(AccessDiff {
        path,
        unified_diff: unified,
    }))
}
