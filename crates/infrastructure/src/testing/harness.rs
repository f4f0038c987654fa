//! Test harness implementation.
//!
//! Collects the units registered by a suite and runs them in order, each on
//! its own task so a panicking hook fails only its unit.

use std::any::Any;
use std::fmt;
use std::time::Instant;

use chrono::Utc;
use regex::Regex;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use apitest_application::UnitFailure;
use apitest_application::ports::{CleanupHook, TestRegistry, TestUnit};

use super::report::{SuiteReport, UnitResult};
use crate::config::HarnessConfig;
use crate::error::HarnessResult;

/// Registry that runs its units sequentially and reports the outcome.
///
/// If any unit is exclusive, only exclusive units run. Units whose name does
/// not match the configured filter are skipped, and so is everything after
/// the first failure when `stop_on_failure` is set. Cleanup hooks run after
/// every executed unit.
#[derive(Default)]
pub struct TestHarness {
    config: HarnessConfig,
    filter: Option<Regex>,
    units: Vec<TestUnit>,
    cleanups: Vec<CleanupHook>,
}

impl TestHarness {
    /// Create a harness with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a harness with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidFilter`](crate::error::HarnessError::InvalidFilter)
    /// if the unit filter does not compile.
    pub fn with_config(config: HarnessConfig) -> HarnessResult<Self> {
        let filter = config.filter_regex()?;
        Ok(Self {
            config,
            filter,
            units: Vec::new(),
            cleanups: Vec::new(),
        })
    }

    /// Returns the harness configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if no unit is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Runs every registered unit.
    pub async fn run(self) -> SuiteReport {
        let Self {
            config,
            filter,
            units,
            cleanups,
        } = self;

        let run_id = Uuid::now_v7();
        let started_at = Utc::now();
        let start = Instant::now();
        let exclusive = units.iter().any(TestUnit::is_exclusive);

        info!(%run_id, units = units.len(), exclusive, "Running suite");

        let mut results = Vec::with_capacity(units.len());
        let mut halted = false;

        for unit in units {
            let name = unit.name().to_string();
            let selected = !halted
                && (!exclusive || unit.is_exclusive())
                && filter.as_ref().is_none_or(|filter| filter.is_match(&name));

            if !selected {
                debug!(unit = %name, "Skipped");
                results.push(UnitResult::skipped(name));
                continue;
            }

            let unit_start = Instant::now();
            let outcome = match tokio::spawn(unit.run()).await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(UnitFailure::Panicked(panic_message(join_error))),
            };
            for cleanup in &cleanups {
                cleanup();
            }

            match &outcome {
                Ok(()) => debug!(unit = %name, "Passed"),
                Err(failure @ UnitFailure::Panicked(_)) => error!(unit = %name, %failure, "Failed"),
                Err(failure) => warn!(unit = %name, %failure, "Failed"),
            }

            halted = outcome.is_err() && config.stop_on_failure;
            results.push(UnitResult::executed(name, outcome, elapsed_ms(unit_start)));
        }

        let report = SuiteReport::new(run_id, started_at, results, elapsed_ms(start));
        info!(
            %run_id,
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            skipped = report.skipped,
            duration_ms = report.duration_ms,
            "Suite finished"
        );
        report
    }
}

impl fmt::Debug for TestHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestHarness")
            .field("config", &self.config)
            .field("units", &self.units)
            .field("cleanups", &self.cleanups.len())
            .finish_non_exhaustive()
    }
}

impl TestRegistry for TestHarness {
    fn register(&mut self, unit: TestUnit) {
        self.units.push(unit);
    }

    fn after_each(&mut self, hook: CleanupHook) {
        self.cleanups.push(hook);
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(join_error: JoinError) -> String {
    if !join_error.is_panic() {
        return join_error.to_string();
    }
    let payload: Box<dyn Any + Send> = join_error.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}
