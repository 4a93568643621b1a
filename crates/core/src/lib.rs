//! Core utilities for Beacon build tools
//!
//! This crate provides shared functionality used across the build, install
//! and release tooling:
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Process execution**: typed command descriptors over synchronous subprocesses
//! - **Configuration**: TOML-based configuration with per-field defaults
//! - **Filesystem helpers**: completion markers and clobber support
//!
//! # Example
//!
//! ```rust,no_run
//! use beacon_core::process::CommandSpec;
//!
//! let status = CommandSpec::new("make")
//!     .arg("-j8")
//!     .arg("BUILDTYPE=Release")
//!     .run_streaming()
//!     .expect("make not runnable");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fsutil;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};
