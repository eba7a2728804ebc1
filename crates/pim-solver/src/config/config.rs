use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::source::{ConfigLoader, ConfigSource, RawConfig};
use crate::error::{PimError, Result};
use crate::solver::{InstalledPolicy, Policy, UpdatedPolicy};

/// Default cap on enumerated satisfying assignments
pub const DEFAULT_MAX_SOLUTIONS: usize = 4096;

/// Which selection policy the solver uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Prefer higher priority repos and newer versions
    #[default]
    Updated,
    /// Prefer what is already installed
    Installed,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Updated => "updated",
            PolicyKind::Installed => "installed",
        }
    }

    /// Instantiate the policy
    pub fn build(&self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Updated => Box::new(UpdatedPolicy),
            PolicyKind::Installed => Box::new(InstalledPolicy),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = PimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "updated" => Ok(PolicyKind::Updated),
            "installed" => Ok(PolicyKind::Installed),
            _ => Err(PimError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_max_solutions() -> usize {
    DEFAULT_MAX_SOLUTIONS
}

/// Resolved solver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SolverConfig {
    /// Selection policy
    #[serde(default)]
    pub policy: PolicyKind,

    /// Upper bound on satisfying assignments enumerated per solve
    #[serde(default = "default_max_solutions")]
    pub max_solutions: usize,

    /// Where each value came from
    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            max_solutions: DEFAULT_MAX_SOLUTIONS,
            sources: HashMap::new(),
        }
    }
}

impl PartialEq for SolverConfig {
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy && self.max_solutions == other.max_solutions
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build configuration from defaults, an optional file and the environment
    pub fn build<P: AsRef<Path>>(path: Option<P>, use_environment: bool) -> Result<Self> {
        ConfigLoader::new(use_environment).build(path)
    }

    /// Source of a configuration value, keyed by its file name
    pub fn get_source(&self, key: &str) -> Option<&ConfigSource> {
        self.sources.get(key)
    }

    pub(crate) fn mark_defaults(&mut self) {
        for key in ["policy", "max-solutions"] {
            self.sources.insert(key.to_string(), ConfigSource::Default);
        }
    }

    /// Merge values from a raw file
    pub(crate) fn merge_raw_config(&mut self, raw: RawConfig, source: ConfigSource) -> Result<()> {
        if let Some(policy) = raw.policy {
            self.policy = policy.parse()?;
            self.sources.insert("policy".to_string(), source.clone());
        }

        if let Some(max) = raw.max_solutions {
            if max == 0 {
                return Err(PimError::Config("max-solutions must be at least 1".to_string()));
            }
            self.max_solutions = max;
            self.sources.insert("max-solutions".to_string(), source);
        }

        Ok(())
    }

    /// Apply `PIM_*` environment overrides; invalid values are ignored
    pub(crate) fn apply_env_overrides(&mut self, loader: &ConfigLoader) {
        if let Some(policy) = loader.get_env("PIM_POLICY") {
            match policy.parse::<PolicyKind>() {
                Ok(kind) => {
                    self.policy = kind;
                    self.sources.insert(
                        "policy".to_string(),
                        ConfigSource::Environment("PIM_POLICY".to_string()),
                    );
                }
                Err(e) => log::warn!("Ignoring PIM_POLICY: {}", e),
            }
        }

        if let Some(max) = loader.get_env_usize("PIM_MAX_SOLUTIONS") {
            if max == 0 {
                log::warn!("Ignoring PIM_MAX_SOLUTIONS: must be at least 1");
            } else {
                self.max_solutions = max;
                self.sources.insert(
                    "max-solutions".to_string(),
                    ConfigSource::Environment("PIM_MAX_SOLUTIONS".to_string()),
                );
            }
        }
    }
}
