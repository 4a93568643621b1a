//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed configuration values
    pub schema: ConfigSchema,
    /// Path the configuration was loaded from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit `path` is tilde-expanded and must exist; without one the
    /// standard candidate locations are searched and defaults apply when
    /// nothing is found.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path
            .map(|p| shellexpand::tilde(p).into_owned())
            .or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".beacon-tools.toml",
        "beacon-tools.toml",
        ".config/beacon-tools.toml",
    ];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    let global = dirs::config_dir()?.join("beacon-tools").join("config.toml");
    if global.exists() {
        return Some(global.to_string_lossy().into_owned());
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read config file {path}: {e}")))?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("failed to parse config file {path}: {e}"),
        )
    })
}
