//! Global logger options

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BoxError;

/// Injected date formatting function
pub type DateFn = Arc<dyn Fn(&DateTime<Utc>) -> Result<String, BoxError> + Send + Sync>;

/// How instants are turned into strings
#[derive(Clone)]
pub enum DateStrategy {
    /// A built-in method by name, e.g. `toISOString` or `toLocaleString`
    Named(String),
    /// An injected function
    Custom(DateFn),
}

impl DateStrategy {
    pub fn named(name: impl Into<String>) -> Self {
        DateStrategy::Named(name.into())
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&DateTime<Utc>) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        DateStrategy::Custom(Arc::new(f))
    }
}

impl Default for DateStrategy {
    fn default() -> Self {
        DateStrategy::Named("toISOString".to_string())
    }
}

impl fmt::Debug for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStrategy::Named(name) => f.debug_tuple("Named").field(name).finish(),
            DateStrategy::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

// Only named strategies survive a config file round trip
impl Serialize for DateStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateStrategy::Named(name) => serializer.serialize_str(name),
            DateStrategy::Custom(_) => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DateStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer)
            .map(|name| name.map(DateStrategy::Named).unwrap_or_default())
    }
}

/// Directory receiving log files, or disabled
///
/// Configured as a path string, or `false`/`null` to turn file output off
/// for every level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDirectory {
    Disabled,
    Path(PathBuf),
}

impl OutputDirectory {
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputDirectory::Disabled => None,
            OutputDirectory::Path(path) => Some(path),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, OutputDirectory::Path(_))
    }
}

impl Default for OutputDirectory {
    fn default() -> Self {
        OutputDirectory::Path(PathBuf::from("./logs"))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OutputDirectoryRepr {
    Flag(bool),
    Path(PathBuf),
}

impl Serialize for OutputDirectory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OutputDirectory::Disabled => OutputDirectoryRepr::Flag(false).serialize(serializer),
            OutputDirectory::Path(path) => serializer.serialize_str(&path.to_string_lossy()),
        }
    }
}

impl<'de> Deserialize<'de> for OutputDirectory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Option::<OutputDirectoryRepr>::deserialize(deserializer)?;
        Ok(match repr {
            None | Some(OutputDirectoryRepr::Flag(false)) => OutputDirectory::Disabled,
            Some(OutputDirectoryRepr::Flag(true)) => OutputDirectory::default(),
            Some(OutputDirectoryRepr::Path(path)) => OutputDirectory::Path(path),
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "log".to_string()
}

fn default_console() -> String {
    "log".to_string()
}

/// Settings shared by every level
///
/// Missing fields fall back to their defaults one by one; explicit values
/// always win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Run every dispatch inline instead of on the deferred queue
    #[serde(default)]
    pub synchronous: bool,
    #[serde(default)]
    pub output_directory: OutputDirectory,
    #[serde(default = "default_extension")]
    pub output_file_extension: String,
    /// Colorize formatted payload values
    #[serde(default = "default_true")]
    pub format_args: bool,
    #[serde(default)]
    pub date_strategy: DateStrategy,
    /// Show timestamps on console lines unless a level overrides it
    #[serde(default = "default_true")]
    pub timestamps: bool,
    /// Console channel used when neither the level nor its label name one
    #[serde(default = "default_console")]
    pub default_console: String,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            synchronous: false,
            output_directory: OutputDirectory::default(),
            output_file_extension: default_extension(),
            format_args: true,
            date_strategy: DateStrategy::default(),
            timestamps: true,
            default_console: default_console(),
        }
    }
}

impl GlobalOptions {
    pub fn with_synchronous(mut self, synchronous: bool) -> Self {
        self.synchronous = synchronous;
        self
    }

    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = OutputDirectory::Path(dir.into());
        self
    }

    pub fn without_file_output(mut self) -> Self {
        self.output_directory = OutputDirectory::Disabled;
        self
    }

    pub fn with_file_extension(mut self, ext: impl Into<String>) -> Self {
        self.output_file_extension = ext.into();
        self
    }

    pub fn with_format_args(mut self, enabled: bool) -> Self {
        self.format_args = enabled;
        self
    }

    pub fn with_date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.date_strategy = strategy;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    pub fn with_default_console(mut self, console: impl Into<String>) -> Self {
        self.default_console = console.into();
        self
    }
}
