//! YAML settings file.
//!
//! # Storage layout
//!
//! ```text
//! ~/.filepush/
//!   config.yaml   (mode 0600 — holds the auth key)
//! ```
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! [`load_from`] reads a settings file at any path.

use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};
use crate::local;
use crate::types::SyncSettings;

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.filepush/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".filepush").join("config.yaml")
}

fn home() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load settings from an explicit file path.
///
/// Returns [`CoreError::ConfigNotFound`] if absent and
/// [`CoreError::ConfigParse`] (with path + line context) if malformed.
pub fn load_from(path: &Path) -> Result<SyncSettings, CoreError> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| CoreError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `<home>/.filepush/config.yaml`.
pub fn load_at(home: &Path) -> Result<SyncSettings, CoreError> {
    load_from(&config_path_at(home))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<SyncSettings, CoreError> {
    load_at(&home()?)
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Write settings to `<home>/.filepush/config.yaml` atomically.
///
/// Creates `~/.filepush/` if needed. The file is restricted to the owner on
/// unix because it carries the auth key.
pub fn save_at(home: &Path, settings: &SyncSettings) -> Result<PathBuf, CoreError> {
    let path = config_path_at(home);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid settings path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let yaml = serde_yaml::to_string(settings)?;
    local::replace_contents(&path, yaml.as_bytes(), owner_only())?;

    tracing::info!("saved settings: {}", path.display());
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(settings: &SyncSettings) -> Result<PathBuf, CoreError> {
    save_at(&home()?, settings)
}

#[cfg(unix)]
fn owner_only() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn owner_only() -> Option<std::fs::Permissions> {
    None
}
