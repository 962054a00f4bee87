//! Validate, compare, write locally, commit remotely.
//!
//! ## `sync_with` — 4-step protocol
//!
//! 1. Validate that `content` and `comment` are text.
//! 2. Compare `content` with the local file → stop if identical.
//! 3. Overwrite the local file.
//! 4. Commit the same content through the [`RemoteCommitter`].
//!
//! Steps 3 and 4 are not atomic together: when the commit fails the local
//! file keeps the new content and the error is returned to the caller.

use filepush_core::{local, FileSyncRequest};
use filepush_remote::{committer_for, FileChange, RemoteCommitter};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Sync outcome
// ---------------------------------------------------------------------------

/// What a sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The local file was rewritten and the provider accepted the commit.
    Committed,
    /// The provider answered without error but reported no commit.
    Rejected,
    /// `content` already matches the local file; nothing was written or sent.
    Unchanged,
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

/// Run the sync with the committer configured in the request's settings.
///
/// A fresh HTTP client is built for every call.
pub fn sync(request: &FileSyncRequest) -> Result<SyncOutcome, SyncError> {
    let committer = committer_for(request.settings());
    sync_with(request, committer.as_ref())
}

/// Run the sync against an explicit committer.
///
/// Validation failures are returned as [`SyncError::Validation`] before any
/// I/O happens.
pub fn sync_with(
    request: &FileSyncRequest,
    committer: &dyn RemoteCommitter,
) -> Result<SyncOutcome, SyncError> {
    // Step 1: validate.
    let valid = request.validate()?;
    let path = request.local_path();

    // Step 2: strict equality against what is on disk right now.
    let current = local::read_current(path)?;
    if current == valid.content {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(SyncOutcome::Unchanged);
    }

    // Step 3: local write.
    local::write_current(path, valid.content)?;
    tracing::info!("wrote: {}", path.display());

    // Step 4: remote commit. Errors propagate; the local write stays.
    let change = FileChange::new(valid.settings, valid.content, valid.comment);
    let committed = committer.commit(&change).map_err(|err| {
        tracing::error!(
            "{} commit of {} failed after local write: {err}",
            committer.backend(),
            path.display()
        );
        err
    })?;

    Ok(if committed {
        SyncOutcome::Committed
    } else {
        SyncOutcome::Rejected
    })
}

// ---------------------------------------------------------------------------
// save
// ---------------------------------------------------------------------------

/// Sync with the configured backend and report whether a commit happened.
///
/// Returns `Ok(false)` when the request is invalid or unchanged, `Ok(true)`
/// after a successful commit, and `Err` for local I/O or remote failures.
pub fn save(request: &FileSyncRequest) -> Result<bool, SyncError> {
    let committer = committer_for(request.settings());
    save_with(request, committer.as_ref())
}

/// [`save`] against an explicit committer.
pub fn save_with(
    request: &FileSyncRequest,
    committer: &dyn RemoteCommitter,
) -> Result<bool, SyncError> {
    match sync_with(request, committer) {
        Ok(outcome) => Ok(outcome == SyncOutcome::Committed),
        Err(SyncError::Validation(err)) => {
            tracing::warn!("not saving {}: {err}", request.local_path().display());
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
