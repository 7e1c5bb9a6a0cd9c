//! Level definitions

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::value::LogValue;

/// Function replacing the default per-value body rendering
///
/// Receives the raw payload, trace element included.
pub type CustomRenderer = Arc<dyn Fn(&[LogValue]) -> Result<String, BoxError> + Send + Sync>;

/// Console-equivalent output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleChannel {
    Log,
    Info,
    Error,
    Warn,
    Debug,
}

impl ConsoleChannel {
    pub const ALL: [ConsoleChannel; 5] = [
        ConsoleChannel::Log,
        ConsoleChannel::Info,
        ConsoleChannel::Error,
        ConsoleChannel::Warn,
        ConsoleChannel::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleChannel::Log => "log",
            ConsoleChannel::Info => "info",
            ConsoleChannel::Error => "error",
            ConsoleChannel::Warn => "warn",
            ConsoleChannel::Debug => "debug",
        }
    }
}

impl FromStr for ConsoleChannel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsoleChannel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ConsoleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether (and where) a level persists its records
///
/// Configured as `false`, `true`, or a string naming a dedicated file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "FileTargetRepr", into = "FileTargetRepr")]
pub enum FileTarget {
    /// No file output
    #[default]
    Disabled,
    /// Shared `log-<date>` file
    Shared,
    /// Dedicated `<label>-log-<date>` file
    Dedicated(String),
}

impl FileTarget {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, FileTarget::Disabled)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FileTargetRepr {
    Flag(bool),
    Named(String),
}

impl From<FileTargetRepr> for FileTarget {
    fn from(repr: FileTargetRepr) -> Self {
        match repr {
            FileTargetRepr::Flag(false) => FileTarget::Disabled,
            FileTargetRepr::Flag(true) => FileTarget::Shared,
            FileTargetRepr::Named(name) => FileTarget::Dedicated(name),
        }
    }
}

impl From<FileTarget> for FileTargetRepr {
    fn from(target: FileTarget) -> Self {
        match target {
            FileTarget::Disabled => FileTargetRepr::Flag(false),
            FileTarget::Shared => FileTargetRepr::Flag(true),
            FileTarget::Dedicated(name) => FileTargetRepr::Named(name),
        }
    }
}

fn default_format() -> Vec<String> {
    vec!["[".to_string(), "]".to_string()]
}

fn default_group_label() -> String {
    "Trace".to_string()
}

/// Trace-grouping settings for a level
///
/// When present, the last payload element is diverted to the trace channel and
/// the line is wrapped in a console group whose header carries the timestamp
/// and domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Text placed before the group header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_prefix: Option<String>,
    /// Label closing the group header
    #[serde(default = "default_group_label")]
    pub label: String,
    /// Decoration pair around the header timestamp and domain
    #[serde(default = "default_format")]
    pub format: Vec<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            group_prefix: None,
            label: default_group_label(),
            format: default_format(),
        }
    }
}

impl TraceConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = Some(prefix.into());
        self
    }

    pub fn with_format(mut self, format: Vec<String>) -> Self {
        self.format = format;
        self
    }
}

/// A named logging level
///
/// Immutable once handed to the [`Logger`](crate::Logger).
#[derive(Clone, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Unique key of the level
    pub label: String,
    /// Text shown before the message body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Two decorations around timestamp and domain, optionally two more around the body
    #[serde(default = "default_format")]
    pub format: Vec<String>,
    #[serde(default)]
    pub file: FileTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceConfig>,
    /// Explicit console channel name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<String>,
    /// Entry point name (defaults to the label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Per-level override of the global timestamp setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<bool>,
    #[serde(skip)]
    pub renderer: Option<CustomRenderer>,
}

impl Default for LevelDefinition {
    /// The built-in `log` level
    fn default() -> Self {
        Self::new("log").with_prefix("[LOG]")
    }
}

impl LevelDefinition {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prefix: None,
            format: default_format(),
            file: FileTarget::Disabled,
            trace: None,
            console: None,
            method: None,
            timestamps: None,
            renderer: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_format<S: Into<String>>(mut self, format: impl IntoIterator<Item = S>) -> Self {
        self.format = format.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file(mut self, file: FileTarget) -> Self {
        self.file = file;
        self
    }

    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn with_console(mut self, console: impl Into<String>) -> Self {
        self.console = Some(console.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Replace the default body rendering with a custom function
    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&[LogValue]) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Name of the generated entry point
    pub fn method_name(&self) -> &str {
        self.method.as_deref().unwrap_or(&self.label)
    }
}

impl fmt::Debug for LevelDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelDefinition")
            .field("label", &self.label)
            .field("prefix", &self.prefix)
            .field("format", &self.format)
            .field("file", &self.file)
            .field("trace", &self.trace)
            .field("console", &self.console)
            .field("method", &self.method)
            .field("timestamps", &self.timestamps)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
