//! Client error taxonomy shared by every backend operation.
//!
//! Three families, matching how feedback reaches the user:
//! - validation errors, raised before any network call
//! - server-reported errors (`message` and/or a Laravel-style `errors` map)
//! - transport or decoding failures, shown as a generic message

use std::collections::BTreeMap;

use serde::Deserialize;

/// Errors from backend operations and client-side validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("Server responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
        /// Field name → messages. Sorted by field name.
        errors: BTreeMap<String, Vec<String>>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Error body as returned by the backend on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a `Server` error from a status code and the raw response body.
    ///
    /// Bodies that are not JSON still produce an error, with no message.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed: ServerErrorBody = serde_json::from_str(body).unwrap_or_default();
        let errors = parsed
            .errors
            .map(|map| {
                map.into_iter()
                    .map(|(field, value)| (field, flatten_messages(value)))
                    .collect()
            })
            .unwrap_or_default();

        Self::Server {
            status,
            message: parsed.message.filter(|m| !m.trim().is_empty()),
            errors,
        }
    }

    /// HTTP status for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.status() == Some(401)
    }

    /// Server `message`, or `fallback` for anything else.
    ///
    /// Validation errors keep their own text.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Server {
                message: Some(msg), ..
            } => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Joined `errors` map when present, else the server message, else `fallback`.
    pub fn detail_or(&self, fallback: &str) -> String {
        match self {
            Self::Server { errors, .. } if !errors.is_empty() => join_field_errors(errors),
            other => other.message_or(fallback),
        }
    }

    /// Per-field messages of a 422 response (empty for everything else).
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            Self::Server { errors, .. } => errors.clone(),
            _ => BTreeMap::new(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// All messages of the map, in field order, joined with ", ".
pub fn join_field_errors(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .values()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn flatten_messages(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s],
        serde_json::Value::Array(items) => items.into_iter().flat_map(flatten_messages).collect(),
        serde_json::Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}
