//! YAML configuration files.
//!
//! A configuration file holds any subset of the [`HarnessConfig`] keys;
//! missing keys keep their defaults and unknown keys are rejected.

use std::path::{Path, PathBuf};

use ldpcheck_domain::HarnessConfig;
use thiserror::Error;

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid YAML for a harness configuration.
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
}

/// Parses a configuration document. An empty document yields the defaults.
///
/// # Errors
///
/// Returns an error if the document is not a valid configuration.
pub fn parse_config(yaml: &str) -> Result<HarnessConfig, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(HarnessConfig::default());
    }
    serde_yaml::from_str(yaml)
}

/// Loads a configuration file.
///
/// The result is not validated; callers layer environment and flag
/// overrides on top first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let config = parse_config(&yaml).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?config, "loaded config file");
    Ok(config)
}
