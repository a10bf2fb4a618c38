//! Client-side error model.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// Result type used across the client layer.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error raised by the request pipeline and surfaced to callers unchanged.
///
/// Only the 401/refresh case is ever recovered inside the pipeline; every
/// other failure propagates as one of these variants and presentation is the
/// caller's concern.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, connection reset, timeout). Carries no
    /// meaningful HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response from the API.
    ///
    /// `details` is the full parsed error body (an empty object when the
    /// body was absent or not JSON), kept so callers can inspect
    /// field-level validation messages.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Value,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The caller's cancellation signal fired before the call completed.
    /// Not a failure; callers must not present it as one.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Build an `Api` error from an HTTP status and a parsed error body.
    ///
    /// The message is taken from a `detail` or `message` string field when
    /// present, with a generic fallback otherwise.
    pub fn api(status: u16, body: Value) -> Self {
        let message = body
            .get("detail")
            .and_then(Value::as_str)
            .or_else(|| body.get("message").and_then(Value::as_str))
            .unwrap_or("an error occurred")
            .to_string();

        ClientError::Api {
            status,
            message,
            details: body,
        }
    }

    /// HTTP status of the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// Field-level validation messages, keyed by field name.
    ///
    /// The API reports validation failures as `{"field": ["msg", ...]}`
    /// entries alongside the optional `detail`/`message` strings; anything
    /// not shaped like a list of strings is ignored.
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        let ClientError::Api { details, .. } = self else {
            return HashMap::new();
        };

        let Some(object) = details.as_object() else {
            return HashMap::new();
        };

        object
            .iter()
            .filter_map(|(field, value)| {
                let messages: Vec<String> = value
                    .as_array()?
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some((field.clone(), messages))
                }
            })
            .collect()
    }
}
