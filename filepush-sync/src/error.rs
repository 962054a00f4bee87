//! Error types for filepush-sync.

use thiserror::Error;

use filepush_core::{CoreError, ValidationError};
use filepush_remote::RemoteError;

/// All errors that can arise from a sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// `content` or `comment` is not text.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Reading or writing the local file failed; nothing was sent remotely.
    #[error("local file error: {0}")]
    Local(#[from] CoreError),

    /// The provider rejected the commit. The local file already holds the
    /// new content.
    #[error("remote commit failed: {0}")]
    Remote(#[from] RemoteError),
}
