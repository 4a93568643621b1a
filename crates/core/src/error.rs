//! Structured error handling with context and recovery suggestions
//!
//! This module provides the error types shared by all Beacon build tools:
//! - Error codes for programmatic handling
//! - Optional context and recovery suggestions
//! - Process exit codes for the CLI surfaces

use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // General errors (1xxx)
    /// Unclassified failure
    Unknown = 1000,
    /// Internal invariant violated
    Internal = 1001,

    // IO errors (2xxx)
    /// Generic I/O failure
    IoError = 2000,
    /// A required file does not exist
    FileNotFound = 2001,
    /// Missing filesystem permissions
    PermissionDenied = 2002,
    /// A path argument is malformed or unusable
    InvalidPath = 2003,

    // Configuration errors (3xxx)
    /// Generic configuration failure
    ConfigError = 3000,
    /// Configuration file could not be parsed
    ConfigParseError = 3001,
    /// A logical build target name is not known
    UnknownTarget = 3002,
    /// Build mode is not one of the accepted values
    InvalidMode = 3003,
    /// The host operating system has no build tool mapping
    UnsupportedHost = 3004,

    // Device errors (4xxx)
    /// Generic device-communication failure
    DeviceError = 4000,
    /// No device is attached or the serial is unknown
    NoDevice = 4001,

    // Process errors (5xxx)
    /// Generic subprocess failure
    ProcessError = 5000,
    /// External tool is not installed or not on PATH
    CommandNotFound = 5001,
    /// External tool exited with a non-zero status
    CommandFailed = 5002,
    /// Command descriptor failed validation before spawn
    InvalidCommand = 5003,

    // Stamp errors (6xxx)
    /// Staleness record could not be written
    StampError = 6000,

    // Upload errors (7xxx)
    /// Remote copy or permission change failed
    UploadError = 7000,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Human-readable category derived from the numeric range
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Device",
            5 => "Process",
            6 => "Stamp",
            7 => "Upload",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Construct an error from a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Attach context describing what was being attempted
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a recovery suggestion shown below the message
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Record the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors

    /// Generic I/O failure
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    /// A required file is missing
    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the path exists and is readable")
    }

    /// Generic configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// A logical build target is not in the target table
    pub fn unknown_target(name: &str, valid: &[&str]) -> Self {
        Self::new(
            ErrorCode::UnknownTarget,
            format!("Unknown target '{}'", name),
        )
        .with_suggestion(format!("Valid targets: {}, all", valid.join(", ")))
    }

    /// A build mode outside the accepted set
    pub fn invalid_mode(given: &str) -> Self {
        Self::new(
            ErrorCode::InvalidMode,
            format!("Invalid build mode '{}'", given),
        )
        .with_suggestion("Build mode must be exactly 'Debug' or 'Release'")
    }

    /// Host OS without a native build tool mapping
    pub fn unsupported_host(os: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedHost,
            format!("No build tool mapping for host OS '{}'", os),
        )
        .with_suggestion("Builds are dispatched to xcodebuild on macOS and make on Linux")
    }

    /// Generic device-communication failure
    pub fn device(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeviceError, message)
    }

    /// No attached device could be identified
    pub fn no_device() -> Self {
        Self::new(ErrorCode::NoDevice, "No device serial could be determined")
            .with_suggestion("Attach a device or start an emulator, then check 'adb devices'")
    }

    /// Generic subprocess failure
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProcessError, message)
    }

    /// External tool missing from PATH
    pub fn command_not_found(cmd: &str) -> Self {
        Self::new(
            ErrorCode::CommandNotFound,
            format!("Command not found: {}", cmd),
        )
        .with_suggestion(format!("Install {} or add it to PATH", cmd))
    }

    /// External tool exited non-zero
    pub fn command_failed(program: &str, exit_code: i32) -> Self {
        Self::new(
            ErrorCode::CommandFailed,
            format!("{} exited with status {}", program, exit_code),
        )
    }

    /// Command descriptor rejected before spawn
    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCommand, message)
    }

    /// Staleness record bookkeeping failure
    pub fn stamp(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StampError, message)
    }

    /// Remote storage failure
    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UploadError, message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Everything ran and passed
    pub const SUCCESS: i32 = 0;
    /// Generic failure
    pub const FAILURE: i32 = 1;
    /// Bad mode, target, or configuration file
    pub const CONFIG_ERROR: i32 = 3;
    /// Device could not be reached
    pub const DEVICE_ERROR: i32 = 4;
    /// Remote storage operation failed
    pub const UPLOAD_ERROR: i32 = 5;
    /// Required external tool missing
    pub const COMMAND_NOT_FOUND: i32 = 127;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("TOML parse error: {}", err),
        )
        .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error side of a result
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error side of a result
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
