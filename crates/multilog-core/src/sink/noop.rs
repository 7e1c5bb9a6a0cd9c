//! No-op console sink

use super::traits::ConsoleSink;
use crate::config::ConsoleChannel;
use crate::value::LogValue;

/// A console that discards everything
///
/// Useful when only file output is wanted, or in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConsole;

impl NoopConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for NoopConsole {
    fn write(&self, _channel: ConsoleChannel, _line: &str) {}
    fn group(&self, _header: &str) {}
    fn group_end(&self) {}
    fn trace(&self, _value: &LogValue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_console() {
        let console = NoopConsole::new();

        // These should all do nothing without panicking
        console.log("log message");
        console.group("header");
        console.trace(&LogValue::Null);
        console.group_end();
        console.report("report");
    }
}
