//! Rule model
//!
//! A [`Rule`] is one declarative test case: the request fed to a handler and
//! the response expected back. Rules are only built through
//! [`crate::validation::validate_rule`], so every field here is already
//! normalized (response code defaulted, request collections filled in).

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Name/value mapping used for headers, cookies, identity and client records.
pub type FieldMap = serde_json::Map<String, Value>;

/// Response code expected when a rule does not declare one.
pub const DEFAULT_RESPONSE_CODE: u16 = 200;

/// A validated test rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Human-readable test name, also used as the registration key.
    pub description: String,
    /// Request fed to the handler, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSpec>,
    /// Identity attached to the handler, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSpec>,
    /// Client record attached to the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<FieldMap>,
    /// Expected response.
    pub response: ResponseSpec,
    /// Whether this rule should run exclusively.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub only: bool,
}

impl Rule {
    /// Returns the endpoint declared by the rule request, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.request.as_ref()?.endpoint.as_deref()
    }

    /// Returns true if the rule runs with an identity attached.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Converts the rule back into its declarative JSON shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a request or response value cannot be serialized.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Request data assigned to the handler instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    /// Structured payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Raw payload, used when the handler expects an unparsed body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<String>,
    /// Positional path parameters.
    pub path_parameters: Vec<String>,
    /// Request headers.
    pub headers: FieldMap,
    /// Request cookies.
    pub cookies: FieldMap,
    /// Endpoint override for this rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl RequestSpec {
    /// Returns the payload to hand to the handler: `data` if set, else `rawData`.
    #[must_use]
    pub fn payload(&self) -> Option<Value> {
        self.data
            .clone()
            .or_else(|| self.raw_data.clone().map(Value::String))
    }
}

/// Identity requested by a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSpec {
    /// Use the built-in default identity (`session: true`).
    Default,
    /// Use the given identity fields.
    Custom(FieldMap),
}

impl Serialize for SessionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Default => serializer.serialize_bool(true),
            Self::Custom(fields) => fields.serialize(serializer),
        }
    }
}

/// Expected response of a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    /// Expected status code.
    pub code: u16,
    /// Expected body, compared exactly when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Headers that must be present with these values; extras are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<FieldMap>,
    /// Headers the response must match exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_headers: Option<FieldMap>,
    /// Cookies that must be present with these values; extras are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<FieldMap>,
    /// Cookies the response must match exactly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_cookies: Option<FieldMap>,
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self {
            code: DEFAULT_RESPONSE_CODE,
            body: None,
            headers: None,
            strict_headers: None,
            cookies: None,
            strict_cookies: None,
        }
    }
}
