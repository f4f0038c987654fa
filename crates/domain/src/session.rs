//! Identity attached to a handler before invocation.

use serde::Serialize;
use serde_json::{Value, json};

use crate::rule::{FieldMap, Rule, SessionSpec};

/// Identifier of the built-in default client.
pub const DEFAULT_CLIENT_ID: u64 = 1;

/// Code of the built-in default client.
pub const DEFAULT_CLIENT_CODE: &str = "defaultClient";

/// Identity fields used when a rule sets `session: true`.
#[must_use]
pub fn default_identity() -> FieldMap {
    to_fields(json!({
        "clientId": DEFAULT_CLIENT_ID,
        "clientCode": DEFAULT_CLIENT_CODE,
    }))
}

/// Client record used when an authenticated rule omits `client`.
#[must_use]
pub fn default_client() -> FieldMap {
    to_fields(json!({
        "id": DEFAULT_CLIENT_ID,
        "code": DEFAULT_CLIENT_CODE,
    }))
}

fn to_fields(value: Value) -> FieldMap {
    match value {
        Value::Object(fields) => fields,
        _ => FieldMap::new(),
    }
}

/// An authenticated caller: identity fields plus the tenant client record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    identity: FieldMap,
    client: FieldMap,
}

impl Session {
    /// Creates a session from identity fields and a client record.
    #[must_use]
    pub const fn new(identity: FieldMap, client: FieldMap) -> Self {
        Self { identity, client }
    }

    /// Resolves the session a rule asks for.
    ///
    /// Returns `None` for unauthenticated rules. The identity and the client
    /// each fall back to their built-in default independently.
    #[must_use]
    pub fn from_rule(rule: &Rule) -> Option<Self> {
        let identity = match rule.session.as_ref()? {
            SessionSpec::Default => default_identity(),
            SessionSpec::Custom(fields) => fields.clone(),
        };
        let client = rule.client.clone().unwrap_or_else(default_client);

        Some(Self::new(identity, client))
    }

    /// Returns all identity fields.
    #[must_use]
    pub const fn identity(&self) -> &FieldMap {
        &self.identity
    }

    /// Returns a single identity field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.identity.get(name)
    }

    /// Returns the `clientId` identity field.
    #[must_use]
    pub fn client_id(&self) -> Option<&Value> {
        self.field("clientId")
    }

    /// Returns the `clientCode` identity field.
    #[must_use]
    pub fn client_code(&self) -> Option<&str> {
        self.field("clientCode").and_then(Value::as_str)
    }

    /// Returns the client record.
    #[must_use]
    pub const fn client(&self) -> &FieldMap {
        &self.client
    }
}
