use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted client settings: `$XDG_CONFIG_HOME/opampctl/config.yaml`,
/// falling back to `~/.config/opampctl/config.yaml` when `XDG_CONFIG_HOME`
/// isn't set. No `dirs`/`xdg` crate: this is the entire resolution logic
/// we need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedConfig {
    pub server: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a config directory: neither XDG_CONFIG_HOME nor HOME is set")]
    NoConfigDir,
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
}

pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join("opampctl"));
        }
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoConfigDir)?;
    Ok(PathBuf::from(home).join(".config").join("opampctl"))
}

pub fn load() -> Result<CachedConfig, ConfigError> {
    let path = config_dir()?.join("config.yaml");
    if !path.exists() {
        return Ok(CachedConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn save(config: &CachedConfig) -> Result<(), ConfigError> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Write {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join("config.yaml");
    let contents = serde_yaml::to_string(config).expect("CachedConfig always serializes");
    std::fs::write(&path, contents).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_dir_prefers_xdg_config_home() {
        // SAFETY: single-threaded test, no concurrent env readers.
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-test-home");
        }
        assert_eq!(config_dir().unwrap(), PathBuf::from("/tmp/xdg-test-home/opampctl"));
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
