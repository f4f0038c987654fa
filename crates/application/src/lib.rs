//! Apitest Application - Suite orchestration
//!
//! This crate turns validated rules into registered test units. It defines
//! the ports to the external collaborators (handler engine, mocking sandbox,
//! test registry) and the use cases that drive them.

pub mod error;
pub mod hooks;
pub mod ports;
pub mod use_cases;

pub use error::{SuiteError, SuiteResult, UnitFailure};
pub use hooks::{AfterHook, BeforeHook, ResponseHook, RuleEntry, RuleHooks};
pub use use_cases::{ApiTest, FALLBACK_ENDPOINT, HandlerInvoker, execute};
