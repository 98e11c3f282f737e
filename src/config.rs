use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classifier::{TerminalClassifier, DEFAULT_TERMINALS};
use crate::errors::ConfigError;
use crate::process::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub swallow: SwallowConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwallowConfig {
    /// Master switch for new swallows
    pub enabled: bool,

    /// Bound on parent hops when looking for the spawning terminal
    pub max_ancestry_depth: usize,

    /// Recognised terminal WM_CLASS / executable names (replaces the defaults)
    pub terminals: Vec<String>,

    /// Appended to `terminals`
    pub extra_terminals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub title: String,
    pub timeout_ms: u32,
}

impl Default for SwallowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_ancestry_depth: DEFAULT_MAX_DEPTH,
            terminals: DEFAULT_TERMINALS.iter().map(|t| t.to_string()).collect(),
            extra_terminals: Vec::new(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Swallow".to_string(),
            timeout_ms: 3000,
        }
    }
}

impl Config {
    /// Load from the first readable config file, falling back to defaults
    pub fn load() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %path.display(), "ignoring config: {e}"),
                }
            }
        }

        Config::default()
    }

    pub fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("termswallow/config.toml")),
            dirs::home_dir().map(|p| p.join(".termswallow.toml")),
            Some(PathBuf::from("termswallow.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swallow.max_ancestry_depth == 0 {
            return Err(ConfigError::Invalid {
                message: "swallow.max_ancestry_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl SwallowConfig {
    pub fn classifier(&self) -> TerminalClassifier {
        TerminalClassifier::new(self.terminals.iter().chain(&self.extra_terminals).cloned())
    }
}
