//! Logical build targets and their native projects

use beacon_core::{Error, Result};

/// Logical target name → Xcode project that builds it.
const TARGET_PROJECTS: &[(&str, &str)] = &[
    ("runtime", "runtime/runtime.xcodeproj"),
    ("shell", "shell/shell.xcodeproj"),
    ("browser", "browser/browser.xcodeproj"),
    ("packages", "pkg/packages.xcodeproj"),
];

/// Aggregate targets that go by a different name inside their project.
const TARGET_RENAMES: &[(&str, &str)] = &[("shell", "pull_in_shell")];

/// A resolved build target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Logical name, as passed on the command line and to make
    pub name: &'static str,
    /// Xcode project that owns the target
    pub project: &'static str,
}

impl Target {
    /// Target name to pass to xcodebuild. Renamed aggregates differ from
    /// their logical name; make always uses the logical name.
    #[must_use]
    pub fn native_name(&self) -> &'static str {
        TARGET_RENAMES
            .iter()
            .find(|(name, _)| *name == self.name)
            .map_or(self.name, |(_, renamed)| *renamed)
    }
}

/// Resolve a logical target name, or `all` for every target.
///
/// Unknown names are a configuration error listing the valid names.
pub fn resolve(name: &str) -> Result<Vec<Target>> {
    if name == "all" {
        return Ok(TARGET_PROJECTS
            .iter()
            .map(|&(name, project)| Target { name, project })
            .collect());
    }

    TARGET_PROJECTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(name, project)| vec![Target { name, project }])
        .ok_or_else(|| Error::unknown_target(name, &all_target_names()))
}

/// Every valid logical target name, in table order.
#[must_use]
pub fn all_target_names() -> Vec<&'static str> {
    TARGET_PROJECTS.iter().map(|(name, _)| *name).collect()
}
