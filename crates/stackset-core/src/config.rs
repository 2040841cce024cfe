use crate::cache::DEFAULT_CAPACITY;
use crate::error::{Result, StacksetError};
use crate::types::CallAs;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1980
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Region new stack instances are created in. Falls back to the AWS
    /// default provider chain when unset.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub call_as: CallAs,
    /// Passed as `RetainStacks` when removing suspended-account instances.
    #[serde(default = "default_retain_stacks")]
    pub retain_stacks: bool,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_retain_stacks() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            call_as: CallAs::default(),
            retain_stacks: default_retain_stacks(),
            cache_capacity: default_cache_capacity(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load from a YAML file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(StacksetError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.call_as, CallAs::DelegatedAdmin);
        assert!(config.retain_stacks);
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:1980");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = Config::from_yaml("region: eu-central-1\nserver:\n  port: 8080\n").unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.retain_stacks);
    }

    #[test]
    fn call_as_self_from_yaml() {
        let config = Config::from_yaml("call_as: SELF\nretain_stacks: false\n").unwrap();
        assert_eq!(config.call_as, CallAs::SelfAccount);
        assert!(!config.retain_stacks);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = Config::load(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, StacksetError::ConfigNotFound(_)));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.yaml");
        std::fs::write(&path, "region: ap-southeast-2\ncache_capacity: 16\n").unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(loaded.cache_capacity, 16);
        assert_eq!(loaded.server, ServerConfig::default());
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = Config::from_yaml("server: [1, 2").unwrap_err();
        assert!(matches!(err, StacksetError::Yaml(_)));
    }
}
