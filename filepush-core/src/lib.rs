//! filepush core library — settings, sync requests, local file access, errors.
//!
//! Public API surface:
//! - [`types`] — [`Backend`] and [`SyncSettings`]
//! - [`request`] — [`FileSyncRequest`] and its attribute validation
//! - [`local`] — read / write the tracked local file
//! - [`config`] — load / save settings as YAML
//! - [`error`] — [`CoreError`], [`ValidationError`]

pub mod config;
pub mod error;
pub mod local;
pub mod request;
pub mod types;

pub use error::{CoreError, ValidationError};
pub use request::{AttributeValue, FileSyncRequest, ValidatedRequest};
pub use types::{Backend, SyncSettings, DEFAULT_COMMENT};
