//! File-based logger configuration (YAML or JSON)
//!
//! The user-level file lives at `~/.config/multilog/config.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::level::LevelDefinition;
use super::options::GlobalOptions;
use crate::error::LogResult;

/// Levels plus global options
///
/// # Example
///
/// ```
/// use multilog_core::config::LoggerConfig;
///
/// let config = LoggerConfig::from_yaml_str(r#"
/// levels:
///   - label: audit
///     prefix: "[AUDIT]"
///     file: audit
/// options:
///   synchronous: true
/// "#).unwrap();
///
/// assert_eq!(config.levels[0].label, "audit");
/// assert!(config.options.synchronous);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub levels: Vec<LevelDefinition>,
    #[serde(default)]
    pub options: GlobalOptions,
}

impl LoggerConfig {
    pub fn new(levels: Vec<LevelDefinition>, options: GlobalOptions) -> Self {
        Self { levels, options }
    }

    /// Add a level
    pub fn with_level(mut self, level: LevelDefinition) -> Self {
        self.levels.push(level);
        self
    }

    pub fn with_options(mut self, options: GlobalOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_yaml_str(content: &str) -> LogResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> LogResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a config file, YAML unless the extension is `.json`
    pub fn from_file(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> LogResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Load the user-level config file
    pub fn load_user() -> LogResult<Self> {
        Self::load(Self::user_config_path())
    }

    /// `<config_dir>/multilog/config.yaml`
    pub fn user_config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("multilog").join("config.yaml")
    }

    pub fn to_yaml(&self) -> LogResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
