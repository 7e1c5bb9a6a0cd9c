//! Levels resolved against the global options
//!
//! Everything a dispatch needs to know about a level (effective console
//! channel, timestamp visibility, decorations, file policy) is computed once,
//! when the logger is built.

use crate::config::{ConsoleChannel, GlobalOptions, LevelDefinition, TraceConfig};
use crate::error::LogError;
use crate::report::ErrorReporter;

/// Decoration strings around the timestamp/domain, and optionally the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorations {
    pub open: String,
    pub close: String,
    /// Present when the level's `format` has four entries
    pub outer: Option<(String, String)>,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            open: "[".to_string(),
            close: "]".to_string(),
            outer: None,
        }
    }
}

impl Decorations {
    /// Parse a two- or four-element format; any other length is rejected
    pub fn from_format(format: &[String]) -> Result<Self, usize> {
        match format {
            [open, close] => Ok(Self {
                open: open.clone(),
                close: close.clone(),
                outer: None,
            }),
            [open, close, outer_open, outer_close] => Ok(Self {
                open: open.clone(),
                close: close.clone(),
                outer: Some((outer_open.clone(), outer_close.clone())),
            }),
            _ => Err(format.len()),
        }
    }

    /// `text` wrapped in the open/close pair
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.open, text, self.close)
    }

    /// `body` wrapped in the outer pair, if any
    pub fn wrap_body(&self, body: String) -> String {
        match &self.outer {
            Some((open, close)) => format!("{}{}{}", open, body, close),
            None => body,
        }
    }
}

/// A level definition with every per-call decision precomputed
#[derive(Debug, Clone)]
pub struct ResolvedLevel {
    pub definition: LevelDefinition,
    pub channel: ConsoleChannel,
    pub show_timestamp: bool,
    pub decorations: Decorations,
    /// Decorations for the group header; present iff the level traces
    pub trace_decorations: Option<Decorations>,
    /// File output requested by the level and allowed by the options
    pub writes_file: bool,
}

impl ResolvedLevel {
    /// Resolve a definition, reporting and replacing any invalid setting
    pub fn resolve(
        definition: LevelDefinition,
        options: &GlobalOptions,
        reporter: &ErrorReporter,
    ) -> Self {
        let channel = resolve_channel(&definition, options, reporter);
        let show_timestamp = definition.timestamps.unwrap_or(options.timestamps);

        let decorations = Decorations::from_format(&definition.format).unwrap_or_else(|len| {
            reporter.report(&LogError::InvalidFormat {
                level: definition.label.clone(),
                len,
            });
            Decorations::default()
        });

        let trace_decorations = definition.trace.as_ref().map(|trace| {
            Decorations::from_format(&trace.format)
                .map(|d| Decorations { outer: None, ..d })
                .unwrap_or_else(|len| {
                    reporter.report(&LogError::InvalidFormat {
                        level: format!("{} (trace)", definition.label),
                        len,
                    });
                    Decorations::default()
                })
        });

        let writes_file = definition.file.is_enabled() && options.output_directory.is_enabled();

        Self {
            definition,
            channel,
            show_timestamp,
            decorations,
            trace_decorations,
            writes_file,
        }
    }

    pub fn label(&self) -> &str {
        &self.definition.label
    }

    pub fn prefix(&self) -> &str {
        self.definition.prefix.as_deref().unwrap_or("")
    }

    pub fn trace(&self) -> Option<&TraceConfig> {
        self.definition.trace.as_ref()
    }

    pub fn is_traced(&self) -> bool {
        self.definition.trace.is_some()
    }
}

/// Explicit sink if valid, else the label if it names a channel, else the global default
fn resolve_channel(
    definition: &LevelDefinition,
    options: &GlobalOptions,
    reporter: &ErrorReporter,
) -> ConsoleChannel {
    if let Some(explicit) = &definition.console {
        match explicit.parse() {
            Ok(channel) => return channel,
            Err(()) => reporter.report(&LogError::invalid_console_sink(&definition.label, explicit)),
        }
    }

    if let Ok(channel) = definition.label.parse() {
        return channel;
    }

    options.default_console.parse().unwrap_or_else(|()| {
        reporter.report(&LogError::invalid_console_sink(
            "<default>",
            &options.default_console,
        ));
        ConsoleChannel::Log
    })
}
