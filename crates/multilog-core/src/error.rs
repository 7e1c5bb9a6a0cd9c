//! Error types for the dispatch pipeline
//!
//! None of these ever reach the caller of a logging method. They are
//! funneled through the [`ErrorReporter`](crate::report::ErrorReporter)
//! instead.

use thiserror::Error;

/// Boxed error returned by injected functions (custom renderers, date strategies)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Broad category of an internal fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Missing or invalid configuration referenced at runtime
    Configuration,
    /// A renderer or date function failed
    Formatting,
    /// The file sink rejected a write
    Sink,
}

/// Errors that can occur inside the logging pipeline
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    #[error("Unknown logging method: {0}")]
    UnknownMethod(String),

    #[error("Invalid date strategy: {0}")]
    InvalidDateStrategy(String),

    #[error("Invalid console sink \"{sink}\" for level {level}")]
    InvalidConsoleSink { level: String, sink: String },

    #[error("Invalid format for level {level}: expected 2 or 4 decorations, got {len}")]
    InvalidFormat { level: String, len: usize },

    #[error("Level {0} has no trace configuration")]
    MissingTraceConfig(String),

    #[error("Date formatting failed: {0}")]
    DateFormat(String),

    #[error("Custom renderer failed for level {level}: {message}")]
    Render { level: String, message: String },

    #[error("Dispatch panicked: {0}")]
    Panic(String),

    #[error("Failed to start dispatch worker: {0}")]
    Spawn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LogError {
    /// Create a custom renderer error
    pub fn render(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            level: level.into(),
            message: message.into(),
        }
    }

    /// Create an invalid console sink error
    pub fn invalid_console_sink(level: impl Into<String>, sink: impl Into<String>) -> Self {
        Self::InvalidConsoleSink {
            level: level.into(),
            sink: sink.into(),
        }
    }

    /// Build an error from a caught panic payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panic(message)
    }

    /// Taxonomy bucket of this error
    pub fn kind(&self) -> FaultKind {
        match self {
            LogError::UnknownLevel(_)
            | LogError::UnknownMethod(_)
            | LogError::InvalidDateStrategy(_)
            | LogError::InvalidConsoleSink { .. }
            | LogError::InvalidFormat { .. }
            | LogError::MissingTraceConfig(_)
            | LogError::Spawn(_)
            | LogError::Yaml(_) => FaultKind::Configuration,
            LogError::DateFormat(_)
            | LogError::Render { .. }
            | LogError::Panic(_)
            | LogError::Json(_) => FaultKind::Formatting,
            LogError::Io(_) => FaultKind::Sink,
        }
    }
}

pub type LogResult<T> = Result<T, LogError>;
