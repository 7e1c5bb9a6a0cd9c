//! Standard stream console sink

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::traits::ConsoleSink;
use crate::config::ConsoleChannel;
use crate::value::LogValue;

/// Writes to stdout/stderr
///
/// `log`, `info` and `debug` go to stdout; `warn`, `error`, traces and internal
/// reports go to stderr. Lines inside an open group are indented by two spaces
/// per level.
#[derive(Debug, Default)]
pub struct StdConsole {
    depth: AtomicUsize,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current group nesting depth
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    fn indent(&self, text: &str) -> String {
        let depth = self.depth();
        if depth == 0 {
            return text.to_string();
        }
        let pad = "  ".repeat(depth);
        text.lines()
            .map(|line| format!("{}{}", pad, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Write errors (closed pipe, etc.) are ignored
    fn emit(&self, to_stderr: bool, text: &str) {
        let text = self.indent(text);
        if to_stderr {
            let _ = writeln!(io::stderr().lock(), "{}", text);
        } else {
            let _ = writeln!(io::stdout().lock(), "{}", text);
        }
    }
}

impl ConsoleSink for StdConsole {
    fn write(&self, channel: ConsoleChannel, line: &str) {
        let to_stderr = matches!(channel, ConsoleChannel::Warn | ConsoleChannel::Error);
        self.emit(to_stderr, line);
    }

    fn group(&self, header: &str) {
        self.emit(false, header);
        self.depth.fetch_add(1, Ordering::SeqCst);
    }

    fn group_end(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
    }

    fn trace(&self, value: &LogValue) {
        self.emit(true, &format!("Trace: {}", value));
    }

    fn report(&self, block: &str) {
        self.emit(true, block);
    }
}
