use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://sourceforge.net";
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Resolved parameters for one fetch run: whose projects, and where to put them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    pub username: String,
    pub target_directory: PathBuf,
}

impl FetchParams {
    pub fn new(
        username: impl Into<String>,
        target_directory: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let username = username.into();
        let target_directory = target_directory.into();

        if username.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "username",
                reason: "must not be empty".into(),
            });
        }
        if target_directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "target_directory",
                reason: "must not be empty".into(),
            });
        }

        Ok(Self {
            username,
            target_directory,
        })
    }

    /// Builds params from the loosely typed key/value bag a host framework hands to a data source.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, ConfigError> {
        let username = string_param(params, "username")?;
        let target_directory = string_param(params, "target_directory")?;
        Self::new(username, target_directory)
    }

    pub fn trace_loaded(&self) {
        info!(
            username = %self.username,
            target_directory = %self.target_directory.display(),
            "Loaded SourceForge fetch parameters"
        );
    }
}

fn string_param<'a>(params: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, ConfigError> {
    match params.get(key) {
        None | Some(Value::Null) => Err(ConfigError::MissingKey(key)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

/// Tunables that are not part of the connection form: endpoint, timeouts, VCS binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceForgeSettings {
    pub api_base_url: String,
    /// Unset means the listing request may block indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Unset means a clone may run indefinitely.
    pub clone_timeout_secs: Option<u64>,
    pub git_program: String,
}

impl Default for SourceForgeSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            clone_timeout_secs: None,
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
        }
    }
}

impl SourceForgeSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn clone_timeout(&self) -> Option<Duration> {
        self.clone_timeout_secs.map(Duration::from_secs)
    }

    pub fn trace_loaded(&self) {
        info!(
            api_base_url = %self.api_base_url,
            git_program = %self.git_program,
            "Loaded SourceForge settings"
        );
        debug!(?self, "Settings loaded (full debug)");
    }
}
