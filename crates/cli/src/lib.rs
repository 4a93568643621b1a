//! Terminal conveniences shared by the Beacon binaries
//!
//! Status lines, value formatting, and spinners live here so the
//! install, build, and bot CLIs print consistently.

#![warn(missing_docs)]

pub mod output;
pub mod progress;
