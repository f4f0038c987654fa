//! Response snapshot type
//!
//! A [`ResponseSnapshot`] is the uniform result of invoking a handler for one
//! rule, whether the handler succeeded or failed.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::rule::FieldMap;

/// Status code used when a handler failure does not carry one.
pub const DEFAULT_FAILURE_CODE: u16 = 500;

/// Normalized response captured from a handler invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// Response status code.
    pub code: u16,
    /// Response body, if the handler set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Response headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<FieldMap>,
    /// Response cookies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<FieldMap>,
}

impl ResponseSnapshot {
    /// Creates a snapshot with only a status code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self {
            code,
            body: None,
            headers: None,
            cookies: None,
        }
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the headers (builder pattern).
    #[must_use]
    pub fn with_headers(mut self, headers: FieldMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the cookies (builder pattern).
    #[must_use]
    pub fn with_cookies(mut self, cookies: FieldMap) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// Builds the snapshot that stands for a failed handler phase.
    ///
    /// The code comes from the failure (500 if it has none) and the body from
    /// the failure body, or `{ "message": <message> }`.
    #[must_use]
    pub fn from_failure(failure: &HandlerFailure) -> Self {
        let body = failure
            .body
            .clone()
            .unwrap_or_else(|| json!({ "message": failure.message }));

        Self::new(failure.status_code.unwrap_or(DEFAULT_FAILURE_CODE)).with_body(body)
    }

    /// Collapses a handler outcome into a snapshot.
    #[must_use]
    pub fn from_outcome(outcome: Result<Self, HandlerFailure>) -> Self {
        outcome.unwrap_or_else(|failure| Self::from_failure(&failure))
    }
}

/// Failure raised by a handler while validating or processing a request.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HandlerFailure {
    /// HTTP status code carried by the failure.
    pub status_code: Option<u16>,
    /// Response body carried by the failure.
    pub body: Option<Value>,
    /// Human-readable message.
    pub message: String,
}

impl HandlerFailure {
    /// Creates a failure with a status code and message.
    #[must_use]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            body: None,
            message: message.into(),
        }
    }

    /// Creates a failure that carries no status code.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            body: None,
            message: message.into(),
        }
    }

    /// Sets the response body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}
