//! Android device access for Beacon build tools.
//!
//! Thin wrapper over the `adb` binary:
//! - Locating adb (explicit SDK tools directory or PATH)
//! - Device serial discovery
//! - Building the install invocation

#![warn(missing_docs)]

mod adb;

pub use adb::Adb;
