//! In-memory sinks

use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::traits::{ConsoleSink, FileSink};
use crate::config::ConsoleChannel;
use crate::value::LogValue;

/// One recorded console interaction
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    Line { channel: ConsoleChannel, text: String },
    GroupStart(String),
    GroupEnd,
    Trace(LogValue),
    Report(String),
}

/// Console sink that records every event in order
///
/// # Example
///
/// ```
/// use multilog_core::sink::{ConsoleSink, MemoryConsole};
///
/// let console = MemoryConsole::new();
/// console.info("hello");
/// assert_eq!(console.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryConsole {
    events: Mutex<Vec<ConsoleEvent>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events.lock().clone()
    }

    /// Text of every line written through a channel
    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ConsoleEvent::Line { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Internal error report blocks
    pub fn reports(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ConsoleEvent::Report(block) => Some(block.clone()),
                _ => None,
            })
            .collect()
    }

    /// Events other than internal reports
    pub fn dispatched(&self) -> Vec<ConsoleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| !matches!(event, ConsoleEvent::Report(_)))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: ConsoleEvent) {
        self.events.lock().push(event);
    }
}

impl ConsoleSink for MemoryConsole {
    fn write(&self, channel: ConsoleChannel, line: &str) {
        self.push(ConsoleEvent::Line {
            channel,
            text: line.to_string(),
        });
    }

    fn group(&self, header: &str) {
        self.push(ConsoleEvent::GroupStart(header.to_string()));
    }

    fn group_end(&self) {
        self.push(ConsoleEvent::GroupEnd);
    }

    fn trace(&self, value: &LogValue) {
        self.push(ConsoleEvent::Trace(value.clone()));
    }

    fn report(&self, block: &str) {
        self.push(ConsoleEvent::Report(block.to_string()));
    }
}

/// One recorded file append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: PathBuf,
    pub content: String,
}

/// File sink that keeps appends in memory
#[derive(Debug, Default)]
pub struct MemoryFileSink {
    writes: Mutex<Vec<FileWrite>>,
}

impl MemoryFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all appends so far
    pub fn writes(&self) -> Vec<FileWrite> {
        self.writes.lock().clone()
    }

    /// Concatenated content appended to one path
    pub fn contents(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        self.writes
            .lock()
            .iter()
            .filter(|write| write.path == path)
            .map(|write| write.content.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSink for MemoryFileSink {
    fn append(&self, path: &Path, line: &str) -> io::Result<()> {
        self.writes.lock().push(FileWrite {
            path: path.to_path_buf(),
            content: line.to_string(),
        });
        Ok(())
    }
}
