//! Rule schema validation.
//!
//! Rules are authored as untyped data (JSON, YAML or `serde_json::json!`).
//! [`validate_rule`] checks the shape in a fixed order and either returns a
//! fully populated [`Rule`] or the first [`RuleError`] found. The input is
//! never modified, so validating the same value twice gives the same result.
//!
//! `null` is treated the same as an absent field.

use serde_json::Value;

use crate::error::{RuleError, RuleResult};
use crate::rule::{DEFAULT_RESPONSE_CODE, FieldMap, RequestSpec, ResponseSpec, Rule, SessionSpec};

/// Returns the rules of a rule table, failing if the table is not an array.
///
/// # Errors
///
/// Returns [`RuleError::InvalidRules`] if `rules` is not an array.
pub fn rule_list(rules: &Value) -> RuleResult<&[Value]> {
    rules
        .as_array()
        .map(Vec::as_slice)
        .ok_or(RuleError::InvalidRules)
}

/// Validates a whole rule table.
///
/// # Errors
///
/// Returns [`RuleError::InvalidRules`] if the table is not an array, or the
/// error of the first invalid rule.
pub fn validate_rules(rules: &Value) -> RuleResult<Vec<Rule>> {
    rule_list(rules)?.iter().map(validate_rule).collect()
}

/// Validates a single rule and builds its normalized form.
///
/// Checks run in this order, stopping at the first violation: rule format,
/// description, request, session, client, response, response code, response
/// headers, response cookies.
///
/// # Errors
///
/// Returns the [`RuleError`] matching the first violated constraint.
pub fn validate_rule(rule: &Value) -> RuleResult<Rule> {
    let rule = rule.as_object().ok_or(RuleError::InvalidFormat)?;

    let description = match field(rule, "description") {
        Some(Value::String(description)) if !description.is_empty() => description.clone(),
        _ => return Err(RuleError::InvalidDescription),
    };

    let request = field(rule, "request").map(request_spec).transpose()?;

    let session = match field(rule, "session") {
        None | Some(Value::Bool(false)) => None,
        Some(Value::Bool(true)) => Some(SessionSpec::Default),
        Some(Value::Object(fields)) => Some(SessionSpec::Custom(fields.clone())),
        Some(_) => return Err(RuleError::InvalidSession),
    };

    let client = field(rule, "client")
        .map(|client| object(client, RuleError::InvalidClient))
        .transpose()?;

    let response = field(rule, "response")
        .ok_or(RuleError::InvalidResponse)
        .and_then(response_spec)?;

    let only = field(rule, "only").and_then(Value::as_bool).unwrap_or(false);

    Ok(Rule {
        description,
        request,
        session,
        client,
        response,
        only,
    })
}

fn request_spec(request: &Value) -> RuleResult<RequestSpec> {
    let request = request.as_object().ok_or(RuleError::InvalidRequest)?;

    let raw_data = match field(request, "rawData") {
        None => None,
        Some(Value::String(raw)) => Some(raw.clone()),
        Some(_) => return Err(RuleError::InvalidRequest),
    };

    let path_parameters = match field(request, "pathParameters") {
        None => Vec::new(),
        Some(Value::Array(parameters)) => parameters
            .iter()
            .map(path_parameter)
            .collect::<RuleResult<_>>()?,
        Some(_) => return Err(RuleError::InvalidRequest),
    };

    let endpoint = match field(request, "endpoint") {
        None => None,
        Some(Value::String(endpoint)) => Some(endpoint.clone()),
        Some(_) => return Err(RuleError::InvalidRequest),
    };

    Ok(RequestSpec {
        data: field(request, "data").cloned(),
        raw_data,
        path_parameters,
        headers: optional_object(request, "headers", RuleError::InvalidRequest)?
            .unwrap_or_default(),
        cookies: optional_object(request, "cookies", RuleError::InvalidRequest)?
            .unwrap_or_default(),
        endpoint,
    })
}

fn path_parameter(parameter: &Value) -> RuleResult<String> {
    match parameter {
        Value::String(value) => Ok(value.clone()),
        Value::Number(value) => Ok(value.to_string()),
        Value::Bool(value) => Ok(value.to_string()),
        _ => Err(RuleError::InvalidRequest),
    }
}

fn response_spec(response: &Value) -> RuleResult<ResponseSpec> {
    let response = response.as_object().ok_or(RuleError::InvalidResponse)?;

    let code = match field(response, "code") {
        None => DEFAULT_RESPONSE_CODE,
        Some(code) => status_code(code).ok_or(RuleError::InvalidResponseCode)?,
    };

    Ok(ResponseSpec {
        code,
        body: field(response, "body").cloned(),
        headers: optional_object(response, "headers", RuleError::InvalidResponseHeaders)?,
        strict_headers: optional_object(
            response,
            "strictHeaders",
            RuleError::InvalidResponseHeaders,
        )?,
        cookies: optional_object(response, "cookies", RuleError::InvalidResponseCookies)?,
        strict_cookies: optional_object(
            response,
            "strictCookies",
            RuleError::InvalidResponseCookies,
        )?,
    })
}

/// Reads a status code from a JSON number. Integral floats such as `200.0`
/// are accepted; anything outside `0..=65535` is not.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn status_code(code: &Value) -> Option<u16> {
    let Value::Number(number) = code else {
        return None;
    };

    if let Some(code) = number.as_u64() {
        return u16::try_from(code).ok();
    }

    number
        .as_f64()
        .filter(|code| code.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(code))
        .map(|code| code as u16)
}

fn field<'a>(object: &'a FieldMap, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

fn object(value: &Value, error: RuleError) -> RuleResult<FieldMap> {
    value.as_object().cloned().ok_or(error)
}

fn optional_object(parent: &FieldMap, name: &str, error: RuleError) -> RuleResult<Option<FieldMap>> {
    field(parent, name).map(|value| object(value, error)).transpose()
}
