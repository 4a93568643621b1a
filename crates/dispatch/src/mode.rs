//! Build modes and host platforms

use beacon_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Build configuration. Exactly two exist; anything else is rejected
/// before a subprocess is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Unoptimized build with assertions
    Debug,
    /// Optimized build
    Release,
}

impl BuildMode {
    /// The spelling build tools expect (`Debug` / `Release`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = Error;

    /// Case-sensitive: the mode names output directories and build tool
    /// arguments, so only the exact spellings are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Debug" => Ok(Self::Debug),
            "Release" => Ok(Self::Release),
            other => Err(Error::invalid_mode(other)),
        }
    }
}

/// Host operating system the dispatcher can build on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// macOS, builds through xcodebuild
    Mac,
    /// Linux, builds through make
    Linux,
}

impl HostOs {
    /// Detect the host we are running on.
    pub fn current() -> Result<Self> {
        Self::from_name(std::env::consts::OS)
    }

    fn from_name(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Self::Mac),
            "linux" => Ok(Self::Linux),
            other => Err(Error::unsupported_host(other)),
        }
    }

    /// Whether this host is macOS.
    #[must_use]
    pub fn is_mac(self) -> bool {
        matches!(self, Self::Mac)
    }
}
