use crate::error::{CliError, Result};
use metalcloud::ClientSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENDPOINT_VAR: &str = "METALCLOUD_ENDPOINT";
pub const API_KEY_VAR: &str = "METALCLOUD_API_KEY";
pub const USER_EMAIL_VAR: &str = "METALCLOUD_USER_EMAIL";

/// Contents of `config.toml`. Every key is optional here, completeness is
/// checked after environment overrides are applied.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub api_key: String,
    pub user_email: String,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Config {
    /// `~/.metalcloud/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".metalcloud").join("config.toml"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::resolve(path, |key| std::env::var(key).ok())
    }

    /// Merge the configuration file with values from `lookup`.
    ///
    /// An explicit `path` must exist; the default location is optional.
    /// Non-empty values returned by `lookup` win over the file.
    pub fn resolve<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => match Self::default_path() {
                Some(default) if default.is_file() => FileConfig::read(&default)?,
                _ => FileConfig::default(),
            },
        };

        let pick = |var: &str, from_file: Option<String>, key: &str| -> Result<String> {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .or(from_file.filter(|v| !v.trim().is_empty()))
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "missing '{}': set it in the configuration file or through {}",
                        key, var
                    ))
                })
        };

        let config = Self {
            endpoint: pick(ENDPOINT_VAR, file.endpoint, "endpoint")?,
            api_key: pick(API_KEY_VAR, file.api_key, "api_key")?,
            user_email: pick(USER_EMAIL_VAR, file.user_email, "user_email")?,
        };
        tracing::debug!(endpoint = %config.endpoint, user = %config.user_email, "configuration loaded");
        Ok(config)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            user: self.user_email.clone(),
        }
    }
}
