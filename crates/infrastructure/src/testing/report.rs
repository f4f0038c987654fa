//! Suite run results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use apitest_application::UnitFailure;

use crate::serialization::{SerializationError, to_json_stable};

/// Outcome of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// The unit ran and its response matched.
    Passed,
    /// The unit ran and failed.
    Failed,
    /// The unit was not run.
    Skipped,
}

/// Result of one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitResult {
    /// Unit name (the rule description).
    pub name: String,
    /// Outcome.
    pub status: UnitStatus,
    /// Failure details for failed units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<UnitFailure>,
    /// Execution time in milliseconds; zero for skipped units.
    pub duration_ms: u64,
}

impl UnitResult {
    /// Builds the result of an executed unit.
    #[must_use]
    pub fn executed(
        name: impl Into<String>,
        outcome: Result<(), UnitFailure>,
        duration_ms: u64,
    ) -> Self {
        let (status, failure) = match outcome {
            Ok(()) => (UnitStatus::Passed, None),
            Err(failure) => (UnitStatus::Failed, Some(failure)),
        };
        Self {
            name: name.into(),
            status,
            failure,
            duration_ms,
        }
    }

    /// Builds the result of a unit that was not run.
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: UnitStatus::Skipped,
            failure: None,
            duration_ms: 0,
        }
    }

    /// Returns true if the unit passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == UnitStatus::Passed
    }
}

/// Results of a whole suite run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-unit results, in registration order.
    pub units: Vec<UnitResult>,
    /// Number of registered units.
    pub total: usize,
    /// Number of passed units.
    pub passed: usize,
    /// Number of failed units.
    pub failed: usize,
    /// Number of skipped units.
    pub skipped: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Create a report, counting outcomes from `units`.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        units: Vec<UnitResult>,
        duration_ms: u64,
    ) -> Self {
        let count = |status| units.iter().filter(|unit| unit.status == status).count();
        let passed = count(UnitStatus::Passed);
        let failed = count(UnitStatus::Failed);
        let skipped = count(UnitStatus::Skipped);

        Self {
            run_id,
            started_at,
            total: units.len(),
            units,
            passed,
            failed,
            skipped,
            duration_ms,
        }
    }

    /// Check if no executed unit failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pass rate of the executed units, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            100.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    /// Failed units, in registration order.
    pub fn failures(&self) -> impl Iterator<Item = &UnitResult> {
        self.units
            .iter()
            .filter(|unit| unit.status == UnitStatus::Failed)
    }

    /// Looks a unit up by name.
    #[must_use]
    pub fn unit(&self, name: &str) -> Option<&UnitResult> {
        self.units.iter().find(|unit| unit.name == name)
    }

    /// Serializes the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SerializationError> {
        to_json_stable(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apitest_domain::{AssertionFailure, Mismatch};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn report() -> SuiteReport {
        let failure = AssertionFailure::new(Mismatch::Code, json!(201), json!(200));
        SuiteReport::new(
            Uuid::now_v7(),
            Utc::now(),
            vec![
                UnitResult::executed("ok", Ok(()), 3),
                UnitResult::executed("bad code", Err(failure.into()), 1),
                UnitResult::skipped("later"),
            ],
            4,
        )
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.all_passed());
        assert!((report.pass_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_report_passes() {
        let report = SuiteReport::new(Uuid::now_v7(), Utc::now(), Vec::new(), 0);
        assert!(report.all_passed());
        assert!((report.pass_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failures_and_lookup() {
        let report = report();
        let names: Vec<_> = report.failures().map(|unit| unit.name.as_str()).collect();
        assert_eq!(names, vec!["bad code"]);
        assert!(report.unit("ok").is_some_and(UnitResult::passed));
        assert!(report.unit("nope").is_none());
    }

    #[test]
    fn test_json_output() {
        let report = report();
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("serializable")).expect("valid json");

        assert_eq!(value["total"], 3);
        assert_eq!(value["units"][0]["status"], "passed");
        assert!(value["units"][0].get("failure").is_none());
        assert_eq!(value["units"][1]["failure"]["type"], "assertion");
        assert_eq!(value["units"][1]["failure"]["detail"]["expected"], 201);
        assert_eq!(value["units"][2]["status"], "skipped");
    }
}
