//! Apitest Domain - Rule model and matching
//!
//! This crate defines the declarative test rules, their validation, and the
//! comparison of captured handler responses against rule expectations.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod matching;
pub mod response;
pub mod rule;
pub mod session;
pub mod validation;

pub use error::{RuleError, RuleResult};
pub use matching::{AssertionFailure, MapField, Mismatch, match_response};
pub use response::{DEFAULT_FAILURE_CODE, HandlerFailure, ResponseSnapshot};
pub use rule::{DEFAULT_RESPONSE_CODE, FieldMap, RequestSpec, ResponseSpec, Rule, SessionSpec};
pub use session::{DEFAULT_CLIENT_CODE, DEFAULT_CLIENT_ID, Session, default_client, default_identity};
pub use validation::{rule_list, validate_rule, validate_rules};
