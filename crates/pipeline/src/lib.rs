//! Buildbot step sequencing for Beacon CI.
//!
//! Drives one bot run end to end:
//! - [`buildinfo`] works out what this builder is from its CI environment
//! - [`steps`] is the policy table of test steps and how their statuses
//!   combine
//! - [`archive`] turns build output directories into product tarballs
//! - [`annotate`] speaks the CI master's step protocol on stdout
//! - [`runner`] executes the fixed sequence and collects every outcome
//!
//! The sequence never short-circuits on test failures: every gated step
//! runs, every status is recorded, and the combined status is an
//! explicit reduction at the end.

#![warn(missing_docs)]

pub mod annotate;
pub mod archive;
pub mod buildinfo;
pub mod runner;
pub mod steps;

pub use buildinfo::{Arch, BuildInfo};
pub use runner::{print_summary, BotRunner};
pub use steps::{combined_status, StepOutcome};
