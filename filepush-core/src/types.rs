//! Domain types for a single-file sync target.
//!
//! All path fields use `PathBuf`; the remote path stays a `String` because it
//! is a repository path, not a filesystem one.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Commit message used when the caller does not provide one.
pub const DEFAULT_COMMENT: &str = "auto comment";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The Git hosting provider that receives the commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Github,
    Gitlab,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Github => write!(f, "github"),
            Backend::Gitlab => write!(f, "gitlab"),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything needed to sync one local file to one remote file.
///
/// Keys are camelCase on disk (`enterpriseUrl`, `authKey`, `localPath`, ...).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    #[serde(default)]
    pub backend: Backend,
    /// Alternate host for self-hosted instances. Empty means the public host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_url: Option<String>,
    pub auth_key: String,
    /// Absolute path to the local file holding the content.
    pub local_path: PathBuf,
    /// Path of the file inside the repository.
    pub remote_path: String,
    /// User, organisation or group namespace.
    pub owner: String,
    pub repository: String,
    #[serde(default = "default_comment")]
    pub comment: String,
}

fn default_comment() -> String {
    DEFAULT_COMMENT.to_owned()
}

impl SyncSettings {
    /// The alternate host, or `None` when unset or blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.enterprise_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// `owner/repository`, the form both providers use as a namespace path.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

// Hand-written so the credential never ends up in logs.
impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("backend", &self.backend)
            .field("enterprise_url", &self.enterprise_url)
            .field("auth_key", &"<redacted>")
            .field("local_path", &self.local_path)
            .field("remote_path", &self.remote_path)
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("comment", &self.comment)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
