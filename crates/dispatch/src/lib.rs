//! Target resolution and build invocation for Beacon.
//!
//! Maps logical build targets onto the native build system of the host:
//! xcodebuild projects on mac, one make invocation elsewhere. The
//! resolver and command builders are pure; running the commands and
//! removing output directories is left to the caller.

#![warn(missing_docs)]

pub mod make;
pub mod mode;
pub mod targets;
pub mod xcode;

pub use mode::{BuildMode, HostOs};
pub use targets::Target;

use beacon_core::process::CommandSpec;
use beacon_core::Result;
use std::path::{Path, PathBuf};

/// A fully resolved build: what to build, how, and where.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Build configuration
    pub mode: BuildMode,
    /// Resolved targets, in table order
    pub targets: Vec<Target>,
    /// Parallel job count (make only; xcodebuild parallelizes itself)
    pub jobs: usize,
    /// Directory the build tools run from
    pub src_root: PathBuf,
}

impl BuildRequest {
    /// Resolve a request from command-line values.
    pub fn new(
        target: &str,
        mode: BuildMode,
        jobs: usize,
        src_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let targets = targets::resolve(target)?;
        tracing::debug!(requested = target, count = targets.len(), %mode, "resolved build targets");
        Ok(Self {
            mode,
            targets,
            jobs,
            src_root: src_root.into(),
        })
    }

    /// The build invocations for `os`, in execution order.
    #[must_use]
    pub fn commands(&self, os: HostOs) -> Vec<CommandSpec> {
        match os {
            HostOs::Mac => self
                .targets
                .iter()
                .map(|target| xcode::build_command(&self.src_root, self.mode, target))
                .collect(),
            HostOs::Linux => vec![make::build_command(
                &self.src_root,
                self.mode,
                self.jobs,
                &self.targets,
            )],
        }
    }

    /// The output directory a clobber removes for `os`.
    #[must_use]
    pub fn clobber_dir(&self, os: HostOs) -> PathBuf {
        let dir = match os {
            HostOs::Mac => xcode::CLOBBER_DIR,
            HostOs::Linux => make::CLOBBER_DIR,
        };
        self.src_root.join(dir)
    }
}

/// Default job count: one per available CPU.
#[must_use]
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZero::get)
}

/// Build output directory for a mode, relative to the source root:
/// `out/<Mode>`.
#[must_use]
pub fn out_dir(src_root: &Path, mode: BuildMode) -> PathBuf {
    src_root.join("out").join(mode.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_builds_one_command_per_target() {
        let request = BuildRequest::new("all", BuildMode::Release, 4, "/work/src").unwrap();
        let commands = request.commands(HostOs::Mac);
        assert_eq!(commands.len(), request.targets.len());
        for spec in &commands {
            assert_eq!(spec.program(), "xcodebuild");
        }
    }

    #[test]
    fn test_linux_builds_single_make() {
        let request = BuildRequest::new("all", BuildMode::Debug, 8, "/work/src").unwrap();
        let commands = request.commands(HostOs::Linux);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program(), "make");
        assert!(commands[0].argv().contains(&"-j8".to_string()));
    }

    #[test]
    fn test_unknown_target_fails_resolution() {
        assert!(BuildRequest::new("webgl", BuildMode::Release, 1, ".").is_err());
    }

    #[test]
    fn test_clobber_dir_per_os() {
        let request = BuildRequest::new("browser", BuildMode::Release, 1, "/work/src").unwrap();
        assert_eq!(
            request.clobber_dir(HostOs::Mac),
            Path::new("/work/src/xcodebuild")
        );
        assert_eq!(
            request.clobber_dir(HostOs::Linux),
            Path::new("/work/src/out")
        );
    }

    #[test]
    fn test_default_jobs_nonzero() {
        assert!(default_jobs() >= 1);
    }

    #[test]
    fn test_out_dir_layout() {
        assert_eq!(
            out_dir(Path::new("/work/src"), BuildMode::Release),
            Path::new("/work/src/out/Release")
        );
    }
}
