//! adb discovery and invocations

use beacon_core::process::{which_command, CommandSpec};
use beacon_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Handle to a concrete adb binary
#[derive(Debug, Clone)]
pub struct Adb {
    path: PathBuf,
}

impl Adb {
    /// Use the adb shipped in an SDK tools directory.
    pub fn from_sdk_tools(sdk_tools: &Path) -> Result<Self> {
        let path = sdk_tools.join("adb");
        if !path.is_file() {
            return Err(Error::file_not_found(&path)
                .with_context("adb not present in the SDK tools directory")
                .with_suggestion("Check the --sdk-tools path points at <sdk>/platform-tools"));
        }
        Ok(Self { path })
    }

    /// Use the adb found on PATH.
    pub fn from_path() -> Result<Self> {
        let path = which_command("adb").ok_or_else(|| {
            Error::command_not_found("adb")
                .with_suggestion("Install Android platform-tools or pass --sdk-tools")
        })?;
        Ok(Self { path })
    }

    /// Path of the adb binary in use.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serial number of the connected device.
    pub fn serial_number(&self) -> Result<String> {
        let result = CommandSpec::new(self.path.display().to_string())
            .arg("get-serialno")
            .run()?;

        let serial = parse_serial(&result.stdout).ok_or_else(|| {
            Error::no_device().with_context(format!(
                "adb get-serialno reported '{}'",
                result.stdout.trim()
            ))
        })?;
        tracing::debug!(%serial, "discovered device serial");
        Ok(serial)
    }

    /// Serials of every attached device, for diagnostics.
    pub fn devices(&self) -> Result<Vec<String>> {
        let result = CommandSpec::new(self.path.display().to_string())
            .arg("devices")
            .run()?;
        Ok(parse_devices(&result.stdout))
    }

    /// The install invocation for an APK: `adb install -r <apk>`.
    ///
    /// `-r` replaces any already installed package. The returned
    /// description doubles as the staleness key for the install, so it
    /// must stay bit-for-bit identical across runs.
    #[must_use]
    pub fn install_command(&self, apk: &Path) -> CommandSpec {
        CommandSpec::new(self.path.display().to_string())
            .arg("install")
            .arg("-r")
            .arg(apk.display().to_string())
    }
}

/// Extract a usable serial from `adb get-serialno` output.
///
/// adb prints `unknown` when no device is attached.
fn parse_serial(output: &str) -> Option<String> {
    let serial = output.trim();
    if serial.is_empty() || serial == "unknown" {
        None
    } else {
        Some(serial.to_string())
    }
}

/// Extract device serials from `adb devices` output, skipping the header
/// and empty lines.
fn parse_devices(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let serial = columns.next()?;
            let state = columns.next()?;
            if state == "device" {
                Some(serial.to_string())
            } else {
                None
            }
        })
        .collect()
}
