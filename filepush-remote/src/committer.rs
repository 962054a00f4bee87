//! The provider-neutral commit interface.

use filepush_core::{Backend, SyncSettings};

use crate::error::RemoteError;
use crate::github::GithubCommitter;
use crate::gitlab::GitlabCommitter;

/// One file's new content, addressed by repository coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChange<'a> {
    pub owner: &'a str,
    pub repository: &'a str,
    pub remote_path: &'a str,
    pub content: &'a str,
    pub message: &'a str,
}

impl<'a> FileChange<'a> {
    /// Address `content` at the remote file named in `settings`.
    pub fn new(settings: &'a SyncSettings, content: &'a str, message: &'a str) -> Self {
        Self {
            owner: &settings.owner,
            repository: &settings.repository,
            remote_path: &settings.remote_path,
            content,
            message,
        }
    }
}

/// Commits a single file change to a Git hosting provider.
///
/// Implementations resolve whatever addressing metadata their provider needs
/// and then issue exactly one update call. They never retry.
pub trait RemoteCommitter {
    fn backend(&self) -> Backend;

    /// Returns `Ok(true)` once the provider has accepted the commit.
    fn commit(&self, change: &FileChange<'_>) -> Result<bool, RemoteError>;
}

/// Build a fresh, credentialed committer for the configured backend.
pub fn committer_for(settings: &SyncSettings) -> Box<dyn RemoteCommitter> {
    match settings.backend {
        Backend::Github => Box::new(GithubCommitter::new(settings.endpoint(), &settings.auth_key)),
        Backend::Gitlab => Box::new(GitlabCommitter::new(settings.endpoint(), &settings.auth_key)),
    }
}
