use std::path::Path;

use opamp_core::resolver::RemoteConfigPolicy;
use serde::Deserialize;

/// `opampd`'s layered configuration: built-in defaults, overridden by a YAML
/// file (`--config`), overridden by `OPAMPD_`-prefixed environment
/// variables. Every field has a default so a bare `opampd` with no flags at
/// all still boots.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind address for the OpAMP transport (WebSocket + HTTP fallback).
    pub opamp_bind_addr: String,
    /// Bind address for the administrator-facing REST API.
    pub rest_bind_addr: String,
    /// Identity this server reports to agents in `ServerToAgent.instance_uid`.
    pub server_identity: String,
    /// How often the soft-delete sweep runs.
    pub sweep_interval_secs: u64,
    /// How long a soft-deleted `AgentRemoteConfig`/`AgentPackage` is kept
    /// before the sweep hard-deletes it.
    pub retention_secs: i64,
    /// How long graceful shutdown waits for in-flight connections to drain.
    pub shutdown_grace_secs: u64,
    pub remote_config_policy: RemoteConfigPolicyConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteConfigPolicyConfig {
    ConfigTakesPrecedence,
    Merge,
}

impl From<RemoteConfigPolicyConfig> for RemoteConfigPolicy {
    fn from(value: RemoteConfigPolicyConfig) -> Self {
        match value {
            RemoteConfigPolicyConfig::ConfigTakesPrecedence => RemoteConfigPolicy::ConfigTakesPrecedence,
            RemoteConfigPolicyConfig::Merge => RemoteConfigPolicy::Merge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opamp_bind_addr: "0.0.0.0:4320".to_string(),
            rest_bind_addr: "0.0.0.0:4321".to_string(),
            server_identity: "opampd".to_string(),
            sweep_interval_secs: 300,
            retention_secs: 7 * 24 * 3600,
            shutdown_grace_secs: 10,
            remote_config_policy: RemoteConfigPolicyConfig::ConfigTakesPrecedence,
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
    #[error("invalid value for environment variable {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

impl Config {
    /// Loads defaults, overlays a YAML file if `path` is given, then overlays
    /// any `OPAMPD_*` environment variables that are set.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = env_var("OPAMPD_OPAMP_BIND_ADDR") {
            self.opamp_bind_addr = value;
        }
        if let Some(value) = env_var("OPAMPD_REST_BIND_ADDR") {
            self.rest_bind_addr = value;
        }
        if let Some(value) = env_var("OPAMPD_SERVER_IDENTITY") {
            self.server_identity = value;
        }
        if let Some(value) = env_var("OPAMPD_SWEEP_INTERVAL_SECS") {
            self.sweep_interval_secs = parse_env("OPAMPD_SWEEP_INTERVAL_SECS", &value)?;
        }
        if let Some(value) = env_var("OPAMPD_RETENTION_SECS") {
            self.retention_secs = parse_env("OPAMPD_RETENTION_SECS", &value)?;
        }
        if let Some(value) = env_var("OPAMPD_SHUTDOWN_GRACE_SECS") {
            self.shutdown_grace_secs = parse_env("OPAMPD_SHUTDOWN_GRACE_SECS", &value)?;
        }
        if let Some(value) = env_var("OPAMPD_REMOTE_CONFIG_POLICY") {
            self.remote_config_policy = match value.as_str() {
                "config-takes-precedence" => RemoteConfigPolicyConfig::ConfigTakesPrecedence,
                "merge" => RemoteConfigPolicyConfig::Merge,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: "OPAMPD_REMOTE_CONFIG_POLICY".to_string(),
                        value,
                    })
                }
            };
        }
        if let Some(value) = env_var("OPAMPD_LOG_FORMAT") {
            self.log_format = match value.as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: "OPAMPD_LOG_FORMAT".to_string(),
                        value,
                    })
                }
            };
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_bind_to_the_standard_ports() {
        let config = Config::default();
        assert_eq!(config.opamp_bind_addr, "0.0.0.0:4320");
        assert_eq!(config.rest_bind_addr, "0.0.0.0:4321");
    }

    #[test]
    fn yaml_overrides_defaults() {
        let yaml = "server_identity: custom-identity\nsweep_interval_secs: 60\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server_identity, "custom-identity");
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.opamp_bind_addr, Config::default().opamp_bind_addr);
    }
}
