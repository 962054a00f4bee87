//! # filepush-sync
//!
//! Write one local file and commit the same content to GitHub or GitLab.
//!
//! Build a [`filepush_core::FileSyncRequest`], set its new content, then call
//! [`save`]. The result is `Ok(true)` once both the local write and the remote
//! commit went through, and `Ok(false)` when there was nothing valid to do.
//! [`sync`] reports the same run as a [`SyncOutcome`] and returns validation
//! failures as errors.

pub mod error;
pub mod orchestrator;

pub use error::SyncError;
pub use orchestrator::{save, save_with, sync, sync_with, SyncOutcome};
