use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::SolverConfig;
use crate::error::{PimError, Result};

/// Represents the source of a configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default built-in value
    Default,
    /// From a configuration file
    File(PathBuf),
    /// From environment variable
    Environment(String),
    /// Programmatically set
    Command,
}

impl ConfigSource {
    pub fn as_str(&self) -> &str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::File(_) => "file",
            ConfigSource::Environment(var) => var,
            ConfigSource::Command => "command",
        }
    }
}

/// Raw configuration data as written in a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_solutions: Option<usize>,
}

/// Loads configuration from files and the environment
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a `PIM_*` environment variable, empty values count as unset
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Get an environment variable as an unsigned integer
    pub fn get_env_usize(&self, var: &str) -> Option<usize> {
        let raw = self.get_env(var)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring {}: '{}' is not a number", var, raw);
                None
            }
        }
    }

    /// Load configuration from a JSON file; a missing file yields no values
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<RawConfig> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("No solver configuration at {}", path.display());
            return Ok(RawConfig::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| PimError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: RawConfig = serde_json::from_str(&contents)
            .map_err(|e| PimError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Build configuration from defaults, the file at `path`, then the environment
    pub fn build<P: AsRef<Path>>(&self, path: Option<P>) -> Result<SolverConfig> {
        let mut config = SolverConfig::default();
        config.mark_defaults();

        // 1. Configuration file
        if let Some(path) = path {
            let path = path.as_ref();
            let raw = self.load_file(path)?;
            config.merge_raw_config(raw, ConfigSource::File(path.to_path_buf()))?;
        }

        // 2. Environment variable overrides
        if self.use_environment {
            config.apply_env_overrides(self);
        }

        log::debug!(
            "Solver configured with policy {} and at most {} solutions",
            config.policy,
            config.max_solutions
        );
        Ok(config)
    }
}
