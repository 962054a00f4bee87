//! # filepush-remote
//!
//! Commit a single file's new content to GitHub or GitLab over their REST
//! APIs.
//!
//! [`committer_for`] picks the provider from [`filepush_core::SyncSettings`];
//! both providers implement [`RemoteCommitter`] and talk HTTP through a
//! [`Transport`], which is [`UreqTransport`] outside of tests.

pub mod committer;
pub mod error;
pub mod github;
pub mod gitlab;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use committer::{committer_for, FileChange, RemoteCommitter};
pub use error::RemoteError;
pub use github::GithubCommitter;
pub use gitlab::{GitlabCommitter, DEFAULT_BRANCH};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, UreqTransport};
