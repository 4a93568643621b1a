//! make invocations for linux hosts

use crate::mode::BuildMode;
use crate::targets::Target;
use beacon_core::process::CommandSpec;
use std::path::Path;

/// Output directory make-based builds write into, relative to the
/// source root.
pub const CLOBBER_DIR: &str = "out";

/// A single make invocation covering every requested target.
///
/// Targets keep their logical names here; renames only exist inside the
/// Xcode projects.
#[must_use]
pub fn build_command(
    src_root: &Path,
    mode: BuildMode,
    jobs: usize,
    targets: &[Target],
) -> CommandSpec {
    CommandSpec::new("make")
        .arg(format!("-j{jobs}"))
        .arg(format!("BUILDTYPE={mode}"))
        .args(targets.iter().map(|t| t.name))
        .current_dir(src_root)
}
