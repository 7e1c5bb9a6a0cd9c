//! Sink trait definitions

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::config::ConsoleChannel;
use crate::value::LogValue;

/// Console-equivalent output
///
/// Implementations:
/// - `StdConsole`: stdout/stderr
/// - `NoopConsole`: silent
/// - `MemoryConsole`: records every event
pub trait ConsoleSink: Send + Sync {
    /// Write one fully-rendered line to a channel
    fn write(&self, channel: ConsoleChannel, line: &str);

    /// Open a group with the given header
    fn group(&self, header: &str);

    /// Close the innermost open group
    fn group_end(&self);

    /// Emit a trace element on the secondary trace channel
    fn trace(&self, value: &LogValue);

    /// Emit an internal error report block
    fn report(&self, block: &str) {
        self.write(ConsoleChannel::Error, block);
    }

    fn log(&self, line: &str) {
        self.write(ConsoleChannel::Log, line);
    }

    fn info(&self, line: &str) {
        self.write(ConsoleChannel::Info, line);
    }

    fn warn(&self, line: &str) {
        self.write(ConsoleChannel::Warn, line);
    }

    fn error(&self, line: &str) {
        self.write(ConsoleChannel::Error, line);
    }

    fn debug(&self, line: &str) {
        self.write(ConsoleChannel::Debug, line);
    }
}

/// Append-or-create file writes
pub trait FileSink: Send + Sync {
    /// Append `line` to `path`, creating the file if it does not exist
    fn append(&self, path: &Path, line: &str) -> io::Result<()>;
}

/// Type alias for an Arc-wrapped console sink
pub type SharedConsole = Arc<dyn ConsoleSink>;

/// Type alias for an Arc-wrapped file sink
pub type SharedFileSink = Arc<dyn FileSink>;
