/// `load_config` module: loads the YAML config file and merges it with command-line overrides.
///
/// This is the only place where user-supplied YAML is parsed and mapped to the
/// strongly typed [`FetchParams`] and [`SourceForgeSettings`] of the core crate.
///
/// # Accepted schema
/// ```text
/// connection:
///   username: alice
///   target_directory: ./mirror
/// settings:                    # optional, every key optional
///   api_base_url: https://sourceforge.net
///   request_timeout_secs: 30
///   clone_timeout_secs: 900
///   git_program: git
/// ```
///
/// # Errors
/// All errors use `anyhow::Error` with context and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use serde::Deserialize;
use sourceforge_harvest_core::config::{FetchParams, SourceForgeSettings};
use sourceforge_harvest_core::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub settings: SourceForgeSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectionSection {
    pub username: Option<String>,
    pub target_directory: Option<PathBuf>,
}

/// Reads and parses a YAML config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .inspect_err(|e| error!(error = ?e, config_path = ?path_ref, "Failed to read config file"))
        .with_context(|| format!("Failed to read config file {path_ref:?}"))?;

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    Ok(config)
}

/// Merges file values with command-line values; command-line values win.
pub fn resolve_params(
    config: &CliConfig,
    username: Option<String>,
    target_directory: Option<PathBuf>,
) -> Result<FetchParams, ConfigError> {
    let username = username
        .or_else(|| config.connection.username.clone())
        .ok_or(ConfigError::MissingKey("username"))?;
    let target_directory = target_directory
        .or_else(|| config.connection.target_directory.clone())
        .ok_or(ConfigError::MissingKey("target_directory"))?;

    let params = FetchParams::new(username, target_directory)?;
    params.trace_loaded();
    Ok(params)
}
