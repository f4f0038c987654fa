//! Apitest Infrastructure - Adapters and harness
//!
//! This crate provides concrete implementations of the application ports:
//! - In-process handler engine
//! - Stub sandbox
//! - Test harness and run reports
//! - Rule table files (JSON/YAML)

pub mod config;
pub mod dispatch;
pub mod error;
pub mod sandbox;
pub mod serialization;
pub mod suite;
pub mod testing;

pub use config::HarnessConfig;
pub use dispatch::{Api, InProcessEngine, ResponseWriter};
pub use error::{HarnessError, HarnessResult};
pub use sandbox::{StubCall, StubSandbox};
pub use serialization::{
    RuleTableError, RuleTableFormat, SerializationError, load_rule_table, parse_rule_table,
    to_json_stable,
};
pub use suite::{run_api_test_file, run_api_test_table, run_api_tests};
pub use testing::{SuiteReport, TestHarness, UnitResult, UnitStatus};
