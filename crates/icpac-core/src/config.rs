use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::AppError;

/// Identifier of this scraper, used for the user agent lookup and logs.
pub const LOOKUP: &str = "hdx-scraper-icpac";

/// Version reported in the run banner and the default user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const PACKAGED_PROJECT_CONFIG: &str = include_str!("../config/project_configuration.yaml");
const PACKAGED_DATASET_STATIC: &str = include_str!("../config/hdx_dataset_static.yaml");

/// Where the legacy entry point expects its project configuration.
pub const LEGACY_PROJECT_CONFIG: &str = "config/project_configuration.yml";

/// HTTP download session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    pub timeout: Duration,
    pub verify_ssl: bool,
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            verify_ssl: true,
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("{LOOKUP}/{VERSION}")
}

/// Source of the project configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The copy compiled into the crate.
    Packaged,
    File(PathBuf),
}

/// Project configuration: where the ICPAC GeoNode lives.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub base_url: String,
}

impl ProjectConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AppError> {
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        if config.base_url.trim().is_empty() {
            return Err(AppError::ConfigError(
                "base_url must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn load(source: &ConfigSource) -> Result<Self, AppError> {
        match source {
            ConfigSource::Packaged => Self::from_yaml_str(PACKAGED_PROJECT_CONFIG),
            ConfigSource::File(path) => {
                let yaml = std::fs::read_to_string(path).map_err(|e| {
                    AppError::ConfigError(format!(
                        "Cannot read project configuration {}: {e}",
                        path.display()
                    ))
                })?;
                Self::from_yaml_str(&yaml)
            }
        }
    }
}

/// Fixed dataset fields shared by every ICPAC dataset (license, source,
/// methodology, ...).
///
/// Only requirement on the document is that it is a YAML mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticDatasetConfig {
    fields: Map<String, Value>,
}

impl StaticDatasetConfig {
    /// Parses the document shipped in `config/hdx_dataset_static.yaml`.
    pub fn packaged() -> Result<Self, AppError> {
        Self::from_yaml_str(PACKAGED_DATASET_STATIC)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, AppError> {
        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(AppError::ConfigError(format!(
                "static dataset configuration must be a YAML mapping, got {other}"
            ))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// The two ways the scraper has historically been launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Reads `config/project_configuration.yml` from the working directory
    /// and skips the write access check.
    Legacy,
    /// Uses the packaged project configuration and checks write access to
    /// the organisation before touching anything.
    Current,
}

impl EntryPoint {
    pub fn project_config(&self) -> ConfigSource {
        match self {
            EntryPoint::Legacy => ConfigSource::File(PathBuf::from(LEGACY_PROJECT_CONFIG)),
            EntryPoint::Current => ConfigSource::Packaged,
        }
    }

    pub fn user_agent_file(&self, home: &Path) -> PathBuf {
        match self {
            EntryPoint::Legacy => home.join(".useragents.yml"),
            EntryPoint::Current => home.join(".useragents.yaml"),
        }
    }

    pub fn checks_write_access(&self) -> bool {
        matches!(self, EntryPoint::Current)
    }
}

/// Everything a single scraper run needs, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub entry_point: EntryPoint,
    pub project_config: ConfigSource,
    pub download: DownloadConfig,
}

impl RunOptions {
    pub fn new(entry_point: EntryPoint) -> Self {
        Self {
            entry_point,
            project_config: entry_point.project_config(),
            download: DownloadConfig::default(),
        }
    }

    pub fn with_project_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_config = ConfigSource::File(path.into());
        self
    }

    pub fn with_download(mut self, download: DownloadConfig) -> Self {
        self.download = download;
        self
    }
}

/// Decides whether TLS certificates are verified.
///
/// An explicit value wins over the `VERIFYSSL` environment value; with
/// neither, verification is on. `false`, `n` and the empty string (any
/// case) turn it off.
pub fn resolve_verify_ssl(explicit: Option<&str>, env_value: Option<&str>) -> bool {
    let value = explicit.or(env_value).unwrap_or("Y").to_lowercase();
    !matches!(value.as_str(), "false" | "n" | "")
}

/// One entry of the user agent YAML file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserAgentEntry {
    pub user_agent: String,
    #[serde(default)]
    pub preprefix: Option<String>,
}

impl UserAgentEntry {
    pub fn compose(&self) -> String {
        match &self.preprefix {
            Some(preprefix) if !preprefix.is_empty() => {
                format!("{preprefix}:{}", self.user_agent)
            }
            _ => self.user_agent.clone(),
        }
    }
}

/// Resolves the HTTP user agent.
///
/// Order: the `USER_AGENT`/`PREPREFIX` environment values, then the
/// [`LOOKUP`] entry of the user agent file, then [`default_user_agent`].
/// A missing file or entry falls through; an unreadable or malformed file
/// is an error.
pub fn resolve_user_agent(
    env_user_agent: Option<&str>,
    env_preprefix: Option<&str>,
    file: Option<&Path>,
) -> Result<String, AppError> {
    if let Some(user_agent) = env_user_agent.filter(|ua| !ua.is_empty()) {
        let entry = UserAgentEntry {
            user_agent: user_agent.to_string(),
            preprefix: env_preprefix.map(str::to_string),
        };
        return Ok(entry.compose());
    }

    if let Some(path) = file.filter(|p| p.exists()) {
        let yaml = std::fs::read_to_string(path)?;
        let entries: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(&yaml)?;
        if let Some(value) = entries.get(LOOKUP) {
            let entry: UserAgentEntry = serde_yaml::from_value(value.clone())?;
            return Ok(entry.compose());
        }
        tracing::debug!(
            path = %path.display(),
            "No {} entry in user agent file, using default",
            LOOKUP
        );
    }

    Ok(default_user_agent())
}
