//! Error types for filepush-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from local file access and configuration loading.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, with the path that was being read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The settings file did not exist at the expected path.
    #[error("settings not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.filepush/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// A `content` or `comment` attribute that cannot be used as text.
///
/// Raised before any I/O happens; the caller can fix the input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The attribute holds a non-string value (object, array, number, ...).
    #[error("{field} must be a string, got {found}")]
    NotText {
        field: &'static str,
        found: &'static str,
    },

    /// The attribute holds raw bytes that are not valid UTF-8.
    #[error("{field} is not valid UTF-8 text")]
    InvalidUtf8 { field: &'static str },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
