//! xcodebuild invocations for mac hosts

use crate::mode::BuildMode;
use crate::targets::Target;
use beacon_core::process::CommandSpec;
use std::path::Path;

/// Output directory xcodebuild writes into, relative to the source root.
pub const CLOBBER_DIR: &str = "xcodebuild";

/// One xcodebuild invocation per target.
#[must_use]
pub fn build_command(src_root: &Path, mode: BuildMode, target: &Target) -> CommandSpec {
    CommandSpec::new("xcodebuild")
        .arg("-project")
        .arg(target.project)
        .arg("-parallelizeTargets")
        .arg("-configuration")
        .arg(mode.as_str())
        .arg("-target")
        .arg(target.native_name())
        .current_dir(src_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::resolve;

    #[test]
    fn test_build_command_argv() {
        let browser = resolve("browser").unwrap()[0];
        let spec = build_command(Path::new("/work/src"), BuildMode::Release, &browser);
        assert_eq!(
            spec.argv(),
            vec![
                "xcodebuild",
                "-project",
                "browser/browser.xcodeproj",
                "-parallelizeTargets",
                "-configuration",
                "Release",
                "-target",
                "browser",
            ]
        );
        assert_eq!(spec.working_dir(), Some(Path::new("/work/src")));
    }

    #[test]
    fn test_build_command_uses_renamed_target() {
        let shell = resolve("shell").unwrap()[0];
        let spec = build_command(Path::new("."), BuildMode::Debug, &shell);
        let argv = spec.argv();
        assert!(argv.contains(&"pull_in_shell".to_string()));
        assert!(!argv.contains(&"shell".to_string()));
    }
}
