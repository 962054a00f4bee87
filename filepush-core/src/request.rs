//! A single sync request: settings plus the `content` / `comment` attributes.
//!
//! A request is built from [`SyncSettings`] with [`FileSyncRequest::open`],
//! which captures the local file's current content as the baseline. The
//! caller then replaces `content` (and optionally `comment`) before handing
//! the request to the sync step. Attributes accept any input; whether it is
//! usable text is decided by [`FileSyncRequest::validate`].

use std::path::Path;

use serde_json::Value;

use crate::error::{CoreError, ValidationError};
use crate::local;
use crate::types::SyncSettings;

// ---------------------------------------------------------------------------
// Attribute values
// ---------------------------------------------------------------------------

/// Raw value assigned to a request attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    /// Bytes that still have to prove they are UTF-8.
    Bytes(Vec<u8>),
    /// Anything else a caller assigned through [`FileSyncRequest::set_attributes`].
    Structured(Value),
}

impl AttributeValue {
    fn as_text(&self, field: &'static str) -> Result<&str, ValidationError> {
        match self {
            AttributeValue::Text(s) => Ok(s.as_str()),
            AttributeValue::Bytes(b) => {
                std::str::from_utf8(b).map_err(|_| ValidationError::InvalidUtf8 { field })
            }
            AttributeValue::Structured(Value::String(s)) => Ok(s.as_str()),
            AttributeValue::Structured(other) => Err(ValidationError::NotText {
                field,
                found: json_kind(other),
            }),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Value> for AttributeValue {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Self::Text(s),
            other => Self::Structured(other),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// FileSyncRequest
// ---------------------------------------------------------------------------

/// One invocation's worth of sync input. Not persisted.
#[derive(Debug, Clone)]
pub struct FileSyncRequest {
    settings: SyncSettings,
    content: AttributeValue,
    comment: AttributeValue,
}

/// Borrowed, validated view of a request.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedRequest<'a> {
    pub settings: &'a SyncSettings,
    pub content: &'a str,
    pub comment: &'a str,
}

impl FileSyncRequest {
    /// Build a request whose `content` starts as the file at `local_path`.
    ///
    /// Fails with [`CoreError::Io`] when the local file cannot be read.
    pub fn open(settings: SyncSettings) -> Result<Self, CoreError> {
        let baseline = local::read_current(&settings.local_path)?;
        let comment = AttributeValue::Text(settings.comment.clone());
        Ok(Self {
            settings,
            content: AttributeValue::Text(baseline),
            comment,
        })
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn local_path(&self) -> &Path {
        &self.settings.local_path
    }

    pub fn content(&self) -> &AttributeValue {
        &self.content
    }

    pub fn comment(&self) -> &AttributeValue {
        &self.comment
    }

    pub fn set_content(&mut self, content: impl Into<AttributeValue>) {
        self.content = content.into();
    }

    pub fn set_content_bytes(&mut self, bytes: impl Into<Vec<u8>>) {
        self.content = AttributeValue::Bytes(bytes.into());
    }

    pub fn set_comment(&mut self, comment: impl Into<AttributeValue>) {
        self.comment = comment.into();
    }

    /// Mass-assign from a JSON object.
    ///
    /// Only the `content` and `comment` keys are assignable; other keys and
    /// non-object input are ignored.
    pub fn set_attributes(&mut self, attributes: &Value) {
        let Some(map) = attributes.as_object() else {
            tracing::debug!("ignoring non-object attribute assignment");
            return;
        };
        if let Some(content) = map.get("content") {
            self.content = content.clone().into();
        }
        if let Some(comment) = map.get("comment") {
            self.comment = comment.clone().into();
        }
    }

    /// Check that `content` and `comment` are both text.
    pub fn validate(&self) -> Result<ValidatedRequest<'_>, ValidationError> {
        Ok(ValidatedRequest {
            settings: &self.settings,
            content: self.content.as_text("content")?,
            comment: self.comment.as_text("comment")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
