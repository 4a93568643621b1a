//! Buildbot step annotations
//!
//! The CI master scrapes stdout for these exact line formats. They are
//! a wire protocol, not logging; the formats must not drift. Output is
//! flushed after every line so annotations stay ordered relative to
//! child process output.

use std::io::Write;

/// `@@@BUILD_STEP <name>@@@` opens a named step on the master.
#[must_use]
pub fn build_step_line(name: &str) -> String {
    format!("@@@BUILD_STEP {name}@@@")
}

/// `@@@STEP_FAILURE@@@` marks the current step failed.
#[must_use]
pub fn step_failure_line() -> &'static str {
    "@@@STEP_FAILURE@@@"
}

/// `@@@STEP_LINK@<label>@<url>@@@` attaches a link to the current step.
#[must_use]
pub fn step_link_line(label: &str, url: &str) -> String {
    format!("@@@STEP_LINK@{label}@{url}@@@")
}

/// Open a named step.
pub fn build_step(name: &str) {
    emit(&build_step_line(name));
}

/// Mark the current step failed.
pub fn step_failure() {
    emit(step_failure_line());
}

/// Attach a link to the current step.
pub fn step_link(label: &str, url: &str) {
    emit(&step_link_line(label, url));
}

fn emit(line: &str) {
    println!("{line}");
    let _ = std::io::stdout().flush();
}
