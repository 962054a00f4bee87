//! Error types for filepush-remote.

use thiserror::Error;

/// All errors that can arise while talking to a Git hosting provider.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The file (GitHub) or project (GitLab) does not exist remotely.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The provider refused the update because the remote changed, e.g. a
    /// stale content sha.
    #[error("conflict updating {resource}: {message}")]
    Conflict { resource: String, message: String },

    /// Any other non-success response, with the provider's message verbatim.
    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A success response whose body did not have the expected shape.
    #[error("unexpected response from {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    /// Map a non-success status to an error for `resource`.
    ///
    /// The provider's JSON `message` field is preferred; otherwise the raw
    /// body is used.
    pub(crate) fn from_status(status: u16, body: &str, resource: impl Into<String>) -> Self {
        let message = provider_message(body);
        match status {
            404 => RemoteError::NotFound {
                resource: resource.into(),
            },
            409 => RemoteError::Conflict {
                resource: resource.into(),
                message,
            },
            _ => RemoteError::Api { status, message },
        }
    }
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("message") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| body.trim().to_owned())
}
