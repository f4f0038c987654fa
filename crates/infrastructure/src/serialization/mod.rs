//! Rule table loading and report serialization.
//!
//! Rule tables are read from JSON or YAML files; reports are written as
//! pretty JSON with 2-space indentation and a trailing newline.

mod json;
mod rule_table;

pub use json::{SerializationError, to_json_stable};
pub use rule_table::{RuleTableError, RuleTableFormat, load_rule_table, parse_rule_table};
