//! Domain error types

use thiserror::Error;

/// Authoring errors raised while validating a rule table.
///
/// Each variant carries a stable integer code (see [`RuleError::code`]) so
/// callers can match on the failure without parsing messages.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleError {
    /// The rule table is not an array.
    #[error("rules error - invalid format, must be an array")]
    InvalidRules,

    /// A rule is not an object.
    #[error("rule error - must be an object")]
    InvalidFormat,

    /// The rule description is missing, empty or not a string.
    #[error("rule error - invalid description, must be a non-empty string")]
    InvalidDescription,

    /// The rule request (or one of its fields) has the wrong shape.
    #[error("rule error - invalid request, must be an object")]
    InvalidRequest,

    /// The rule response is missing or not an object.
    #[error("rule error - invalid response, must be an object")]
    InvalidResponse,

    /// The expected response code is not a valid status number.
    ///
    /// Besides non-numbers this covers numbers that cannot be a status code:
    /// negatives, fractions such as `200.5`, and values above 65535.
    #[error("rule error - invalid response code, must be a number")]
    InvalidResponseCode,

    /// Expected response headers (lenient or strict) are not an object.
    #[error("rule error - invalid response headers, must be an object")]
    InvalidResponseHeaders,

    /// Expected response cookies (lenient or strict) are not an object.
    #[error("rule error - invalid response cookies, must be an object")]
    InvalidResponseCookies,

    /// The rule session is neither a boolean nor an object.
    #[error("rule error - invalid session, must be an object or a boolean")]
    InvalidSession,

    /// The rule client is not an object.
    #[error("rule error - invalid client, must be an object")]
    InvalidClient,
}

impl RuleError {
    /// Returns the numeric code of this error.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::InvalidRules => 1,
            Self::InvalidFormat => 2,
            Self::InvalidDescription => 3,
            Self::InvalidRequest => 4,
            Self::InvalidResponse => 5,
            Self::InvalidResponseCode => 6,
            Self::InvalidResponseHeaders => 7,
            Self::InvalidResponseCookies => 8,
            Self::InvalidSession => 9,
            Self::InvalidClient => 10,
        }
    }

    /// Returns the symbolic name of this error.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidRules => "INVALID_RULES",
            Self::InvalidFormat => "RULE_INVALID_FORMAT",
            Self::InvalidDescription => "RULE_INVALID_DESCRIPTION",
            Self::InvalidRequest => "RULE_INVALID_REQUEST",
            Self::InvalidResponse => "RULE_INVALID_RESPONSE",
            Self::InvalidResponseCode => "RULE_INVALID_RESPONSE_CODE",
            Self::InvalidResponseHeaders => "RULE_INVALID_RESPONSE_HEADERS",
            Self::InvalidResponseCookies => "RULE_INVALID_RESPONSE_COOKIES",
            Self::InvalidSession => "RULE_INVALID_SESSION",
            Self::InvalidClient => "RULE_INVALID_CLIENT",
        }
    }
}

/// Result type alias for rule validation.
pub type RuleResult<T> = Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(RuleError::InvalidRules.code(), 1);
        assert_eq!(RuleError::InvalidFormat.code(), 2);
        assert_eq!(RuleError::InvalidResponseCode.code(), 6);
        assert_eq!(RuleError::InvalidClient.code(), 10);
    }

    #[test]
    fn test_name_and_message() {
        let err = RuleError::InvalidDescription;
        assert_eq!(err.name(), "RULE_INVALID_DESCRIPTION");
        assert!(err.to_string().contains("description"));
    }
}
