//! Test step table and status aggregation

use crate::buildinfo::Arch;
use beacon_core::process::CommandSpec;
use beacon_dispatch::{BuildMode, HostOs};
use std::path::Path;
use std::time::Duration;

/// Condition under which a test step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGate {
    /// Runs everywhere except Debug builds on macOS, where the suite
    /// is too slow to be useful.
    SkipDebugOnMac,
    /// Runs only in Release builds.
    ReleaseOnly,
}

impl StepGate {
    /// Whether a step behind this gate runs for the given mode and host.
    #[must_use]
    pub fn should_run(self, mode: BuildMode, os: HostOs) -> bool {
        match self {
            Self::SkipDebugOnMac => mode == BuildMode::Release || !os.is_mac(),
            Self::ReleaseOnly => mode == BuildMode::Release,
        }
    }
}

/// Whether assertions and type checks are enabled in the harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckedMode {
    /// Production configuration
    Unchecked,
    /// Assertions and type checks on
    Checked,
}

impl CheckedMode {
    /// Harness flag name, without the leading dashes.
    #[must_use]
    pub fn as_flag(self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::Checked => "checked",
        }
    }
}

/// One entry in the bot's test plan.
#[derive(Debug, Clone, Copy)]
pub struct TestStep {
    /// Component under test, passed to the harness
    pub component: &'static str,
    /// Suite to run, passed to the harness
    pub suite: &'static str,
    /// Checked or unchecked harness configuration
    pub checked: CheckedMode,
    /// When this step runs
    pub gate: StepGate,
}

impl TestStep {
    /// Annotated step name, also used in failure summaries.
    #[must_use]
    pub fn step_name(&self) -> String {
        format!(
            "{}_{}_{}_tests",
            self.component,
            self.suite,
            self.checked.as_flag()
        )
    }

    /// Layout suites leave result trees behind that get archived on
    /// failure.
    #[must_use]
    pub fn is_layout(&self) -> bool {
        self.suite == "layout"
    }

    /// Harness invocation for this step.
    #[must_use]
    pub fn command(&self, src_root: &Path, mode: BuildMode, arch: Arch) -> CommandSpec {
        let harness = src_root.join("tools").join("run_tests");
        CommandSpec::new(harness.display().to_string())
            .arg("--buildbot")
            .arg(format!("--mode={mode}"))
            .arg(format!("--component={}", self.component))
            .arg(format!("--suite={}", self.suite))
            .arg(format!("--arch={}", arch.as_str()))
            .arg(format!("--{}", self.checked.as_flag()))
            .arg("--no-show-results")
            .current_dir(src_root)
    }
}

/// The bot's test plan, in execution order.
pub const TEST_STEPS: &[TestStep] = &[
    TestStep {
        component: "shell",
        suite: "layout",
        checked: CheckedMode::Unchecked,
        gate: StepGate::SkipDebugOnMac,
    },
    TestStep {
        component: "shell",
        suite: "layout",
        checked: CheckedMode::Checked,
        gate: StepGate::SkipDebugOnMac,
    },
    TestStep {
        component: "shell",
        suite: "core",
        checked: CheckedMode::Unchecked,
        gate: StepGate::ReleaseOnly,
    },
    TestStep {
        component: "shell",
        suite: "core",
        checked: CheckedMode::Checked,
        gate: StepGate::ReleaseOnly,
    },
];

/// Name and exit status of one completed bot step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Annotated step name
    pub name: String,
    /// Exit status, zero on success
    pub status: i32,
    /// Wall-clock time the step took
    pub duration: Duration,
}

/// Collapse step outcomes into one exit status: the first non-zero
/// status wins, zero when every step passed. Steps after a failure
/// still ran; only the reported status is pinned to the first failure.
#[must_use]
pub fn combined_status(outcomes: &[StepOutcome]) -> i32 {
    outcomes
        .iter()
        .map(|outcome| outcome.status)
        .find(|status| *status != 0)
        .unwrap_or(0)
}
