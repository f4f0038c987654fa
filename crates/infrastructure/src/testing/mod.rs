//! Suite execution.
//!
//! [`TestHarness`] is the registry the suite registers its units with; running
//! it yields a [`SuiteReport`].

mod harness;
mod report;

pub use harness::TestHarness;
pub use report::{SuiteReport, UnitResult, UnitStatus};
