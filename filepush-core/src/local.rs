//! Read and overwrite the tracked local file.
//!
//! Writes go to a uniquely named temporary file next to the target, which is
//! then renamed over it, so a failed write never leaves a truncated file
//! behind. Symlinks are followed: the file they point to is the one replaced,
//! and its permissions are carried over. Parent directories are not created:
//! a missing directory is reported as an I/O error.

use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};

/// Return the full content of the file at `path`.
///
/// Fails with [`CoreError::Io`] when the file is missing, unreadable or not
/// UTF-8 text.
pub fn read_current(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|e| io_err(path, e))
}

/// Overwrite the file at `path` with `text`.
pub fn write_current(path: &Path, text: &str) -> Result<(), CoreError> {
    let target = resolve_target(path)?;
    let permissions = std::fs::metadata(&target).ok().map(|m| m.permissions());
    replace_contents(&target, text.as_bytes(), permissions)?;
    tracing::debug!("wrote {} bytes: {}", text.len(), target.display());
    Ok(())
}

/// Follow symlinks to the real file. A path that does not exist yet is
/// returned unchanged.
fn resolve_target(path: &Path) -> Result<PathBuf, CoreError> {
    match std::fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Atomically replace `target` with `bytes`.
///
/// The temporary file is removed when any step fails.
pub(crate) fn replace_contents(
    target: &Path,
    bytes: &[u8],
    permissions: Option<Permissions>,
) -> Result<(), CoreError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".filepush")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| io_err(dir, e))?;

    tmp.write_all(bytes).map_err(|e| io_err(dir, e))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| io_err(dir, e))?;
    }
    tmp.persist(target).map_err(|e| io_err(target, e.error))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
