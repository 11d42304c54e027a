// Layered runtime configuration: built-in defaults, then a TOML file, then
// HYDRA_* environment variables.

use crate::artifacts::ArtifactPaths;
use crate::errors::{HydraError, HydraResult};
use crate::telemetry::parse_level;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "hydra.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "HYDRA_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraConfig {
    #[serde(default)]
    pub artifacts: ArtifactPaths,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HydraConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl HydraConfig {
    fn check(&self) -> HydraResult<()> {
        if self.artifacts.model_path.as_os_str().is_empty() {
            return Err(HydraError::config("artifacts.model_path cannot be empty"));
        }
        if self.artifacts.scaler_path.as_os_str().is_empty() {
            return Err(HydraError::config("artifacts.scaler_path cannot be empty"));
        }
        if self.server.host.trim().is_empty() {
            return Err(HydraError::config("server.host cannot be empty"));
        }
        if self.server.port == 0 {
            return Err(HydraError::config("server.port must be non-zero"));
        }
        parse_level(&self.log_level)?;
        Ok(())
    }
}

/// Config file the caller asked for by name, either directly or through
/// `HYDRA_CONFIG_PATH`.
fn requested_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

/// Config file to read: explicit path, then `HYDRA_CONFIG_PATH`, then
/// `hydra.toml` in the working directory.
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    requested_config_file(explicit).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

pub fn build_figment(config_path: Option<&Path>) -> Figment {
    Figment::from(Serialized::defaults(HydraConfig::default()))
        .merge(Toml::file(config_file_path(config_path)))
        .merge(Env::prefixed("HYDRA_").ignore(&["config_path"]).split("__"))
}

/// Load configuration.
///
/// Only the implicit `hydra.toml` may be absent. A file named explicitly or
/// through `HYDRA_CONFIG_PATH` must exist.
pub fn load_config(config_path: Option<&Path>) -> HydraResult<HydraConfig> {
    if let Some(path) = requested_config_file(config_path) {
        if !path.is_file() {
            return Err(HydraError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
    }
    let config: HydraConfig = build_figment(config_path).extract()?;
    config.check()?;
    Ok(config)
}
