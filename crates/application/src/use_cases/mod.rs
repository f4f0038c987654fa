//! Application use cases (suite orchestration).

mod invoke_handler;
mod register_suite;

pub use invoke_handler::*;
pub use register_suite::*;
