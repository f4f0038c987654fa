//! Response matching.
//!
//! Compares a captured [`ResponseSnapshot`] against the [`ResponseSpec`] of a
//! rule. Checks run in a fixed order (body, code, headers, cookies) and the
//! first mismatch is returned as an [`AssertionFailure`].
//!
//! The body is only compared when the expected body is truthy: `null`,
//! `false`, `0` and `""` disable the check.
//!
//! Headers and cookies support two modes:
//! - strict (`strictHeaders` / `strictCookies`): the actual mapping must equal
//!   the expected one exactly.
//! - partial (`headers` / `cookies`): every expected name must be present
//!   with an equal value; extra names in the response are ignored.
//!
//! Strict mode wins when both are declared.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::response::ResponseSnapshot;
use crate::rule::{FieldMap, ResponseSpec};

/// The mapping a header/cookie check looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapField {
    /// Response headers.
    Headers,
    /// Response cookies.
    Cookies,
}

impl MapField {
    /// Singular, capitalized label used in messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Headers => "Header",
            Self::Cookies => "Cookie",
        }
    }

    const fn plural(self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::Cookies => "cookies",
        }
    }
}

/// What part of the response did not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mismatch {
    /// The body differs from the expected body.
    Body,
    /// The status code differs from the expected code.
    Code,
    /// A strictly matched mapping differs.
    Strict {
        /// Headers or cookies.
        field: MapField,
    },
    /// An expected header/cookie is not in the response.
    Missing {
        /// Headers or cookies.
        field: MapField,
        /// Header/cookie name.
        name: String,
    },
    /// An expected header/cookie is present with another value.
    Value {
        /// Headers or cookies.
        field: MapField,
        /// Header/cookie name.
        name: String,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "Unexpected response body"),
            Self::Code => write!(f, "Unexpected response code"),
            Self::Strict { field } => write!(f, "Unexpected response {}", field.plural()),
            Self::Missing { field, name } => {
                write!(f, "{} '{}' not found in response", field.label(), name)
            }
            Self::Value { field, name } => write!(f, "{} '{}' value not equal", field.label(), name),
        }
    }
}

/// A failed expectation, with the values that were compared.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}: expected {expected}, got {actual}")]
pub struct AssertionFailure {
    /// What did not match.
    pub mismatch: Mismatch,
    /// Expected value.
    pub expected: Value,
    /// Actual value (`null` when absent).
    pub actual: Value,
    /// Human-readable message.
    pub message: String,
}

impl AssertionFailure {
    /// Creates a failure; the message is derived from the mismatch.
    #[must_use]
    pub fn new(mismatch: Mismatch, expected: Value, actual: Value) -> Self {
        let message = mismatch.to_string();
        Self {
            mismatch,
            expected,
            actual,
            message,
        }
    }
}

/// Checks a response snapshot against an expectation.
///
/// # Errors
///
/// Returns the first [`AssertionFailure`] found.
pub fn match_response(
    expected: &ResponseSpec,
    actual: &ResponseSnapshot,
) -> Result<(), AssertionFailure> {
    if let Some(body) = expected.body.as_ref().filter(|body| is_truthy(body)) {
        let actual_body = actual.body.clone().unwrap_or(Value::Null);
        if &actual_body != body {
            return Err(AssertionFailure::new(Mismatch::Body, body.clone(), actual_body));
        }
    }

    if actual.code != expected.code {
        return Err(AssertionFailure::new(
            Mismatch::Code,
            Value::from(expected.code),
            Value::from(actual.code),
        ));
    }

    match_map(
        MapField::Headers,
        expected.strict_headers.as_ref(),
        expected.headers.as_ref(),
        actual.headers.as_ref(),
    )?;

    match_map(
        MapField::Cookies,
        expected.strict_cookies.as_ref(),
        expected.cookies.as_ref(),
        actual.cookies.as_ref(),
    )
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn match_map(
    field: MapField,
    strict: Option<&FieldMap>,
    partial: Option<&FieldMap>,
    actual: Option<&FieldMap>,
) -> Result<(), AssertionFailure> {
    let empty = FieldMap::new();
    let actual = actual.unwrap_or(&empty);

    if let Some(strict) = strict {
        return match_strict(field, strict, actual);
    }

    partial.map_or(Ok(()), |partial| match_partial(field, partial, actual))
}

fn match_strict(field: MapField, expected: &FieldMap, actual: &FieldMap) -> Result<(), AssertionFailure> {
    if expected == actual {
        Ok(())
    } else {
        Err(AssertionFailure::new(
            Mismatch::Strict { field },
            Value::Object(expected.clone()),
            Value::Object(actual.clone()),
        ))
    }
}

fn match_partial(field: MapField, expected: &FieldMap, actual: &FieldMap) -> Result<(), AssertionFailure> {
    for (name, value) in expected {
        match actual.get(name) {
            None => {
                return Err(AssertionFailure::new(
                    Mismatch::Missing {
                        field,
                        name: name.clone(),
                    },
                    value.clone(),
                    Value::Null,
                ));
            }
            Some(actual_value) if actual_value != value => {
                return Err(AssertionFailure::new(
                    Mismatch::Value {
                        field,
                        name: name.clone(),
                    },
                    value.clone(),
                    actual_value.clone(),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}
