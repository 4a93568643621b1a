//! Build identity from the CI environment

use beacon_core::process::CommandSpec;
use beacon_dispatch::BuildMode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Builder environment variable carrying the bot name
pub const BUILDER_NAME_VAR: &str = "BUILDBOT_BUILDERNAME";
/// Builder environment variable carrying the revision under build
pub const REVISION_VAR: &str = "BUILDBOT_REVISION";

/// Archiving builders are named `beacon-<platform>-<variant>`.
static BUILDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^beacon-(\w+)-(\w+)").unwrap());

/// Target architecture of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 32-bit x86
    Ia32,
    /// 64-bit x86
    X64,
}

impl Arch {
    /// The spelling the test harness expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ia32 => "ia32",
            Self::X64 => "x64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What this bot run is: who is building, which revision, and what the
/// builder name implies about mode, architecture and archiving.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Builder name, or the host name off the CI fleet
    pub name: String,
    /// Version string for artifacts: `<revision>.0`
    pub version: String,
    /// Build configuration implied by the builder name
    pub mode: BuildMode,
    /// Target architecture implied by the builder name
    pub arch: Arch,
    /// Whether this builder generates and uploads archives
    pub do_archive: bool,
    /// Whether this is a trunk builder (archives before testing)
    pub is_trunk: bool,
}

impl BuildInfo {
    /// Derive build identity from a builder name and revision.
    ///
    /// Names matching `beacon-<platform>-<variant>` archive their
    /// output; `lucid64` platforms are x64, everything else ia32, and a
    /// `debug` variant selects a Debug build. Non-matching names (for
    /// example a developer workstation) build Release, ia32, and do not
    /// archive.
    #[must_use]
    pub fn from_parts(name: &str, revision: &str) -> Self {
        let mut mode = BuildMode::Release;
        let mut arch = Arch::Ia32;
        let mut do_archive = false;

        if let Some(captures) = BUILDER_RE.captures(name) {
            arch = if &captures[1] == "lucid64" {
                Arch::X64
            } else {
                Arch::Ia32
            };
            if &captures[2] == "debug" {
                mode = BuildMode::Debug;
            }
            do_archive = true;
        }

        Self {
            name: name.to_string(),
            version: format!("{revision}.0"),
            mode,
            arch,
            do_archive,
            is_trunk: name.contains("trunk"),
        }
    }

    /// Derive build identity from the CI environment, falling back to
    /// the host name and a zero revision off the fleet.
    #[must_use]
    pub fn from_env() -> Self {
        let name = std::env::var(BUILDER_NAME_VAR)
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(short_hostname);
        let revision = std::env::var(REVISION_VAR)
            .ok()
            .filter(|revision| !revision.is_empty())
            .unwrap_or_else(|| "0".to_string());

        let info = Self::from_parts(&name, &revision);
        tracing::debug!(
            name = %info.name,
            version = %info.version,
            mode = %info.mode,
            arch = %info.arch,
            do_archive = info.do_archive,
            "resolved build info"
        );
        info
    }

    /// Storage bucket for a product module, derived from the builder
    /// name by substitution: builder `beacon-mac-full` puts its shell
    /// product under `shell-mac-full`.
    #[must_use]
    pub fn bucket(&self, module: &str) -> String {
        self.name.replace("beacon", module)
    }

    /// Versioned archive name for a product module, without extension.
    #[must_use]
    pub fn archive_name(&self, module: &str) -> String {
        format!("{}-{}", self.bucket(module), self.version)
    }

    /// Incremental builders publish an unversioned continuous object.
    #[must_use]
    pub fn is_incremental(&self) -> bool {
        self.name.ends_with("-inc")
    }

    /// Continuous object name: the bucket without its `-inc` suffix.
    #[must_use]
    pub fn continuous_name(&self, module: &str) -> String {
        let bucket = self.bucket(module);
        bucket
            .strip_suffix("-inc")
            .map_or_else(|| bucket.clone(), String::from)
    }
}

/// First dot-separated label of the host name, or `unknown`.
fn short_hostname() -> String {
    let result = CommandSpec::new("hostname").run();
    match result {
        Ok(result) if result.success => {
            let hostname = result.stdout.trim();
            let label = hostname.split('.').next().unwrap_or(hostname);
            if label.is_empty() {
                "unknown".to_string()
            } else {
                label.to_string()
            }
        }
        _ => "unknown".to_string(),
    }
}
