//! Internal error reporter
//!
//! Every fault inside the pipeline ends up here. The reporter writes a
//! diagnostic block to the console sink and returns; it never raises.

use std::error::Error as _;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::LogError;
use crate::format::date::iso_string;
use crate::sink::SharedConsole;

const BANNER: &str = "[multilog] internal logging error";

/// Cheap, clonable handle to the single report capability
#[derive(Clone)]
pub struct ErrorReporter {
    console: SharedConsole,
    clock: Arc<dyn Clock>,
    count: Arc<AtomicUsize>,
}

impl ErrorReporter {
    pub fn new(console: SharedConsole, clock: Arc<dyn Clock>) -> Self {
        Self {
            console,
            clock,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Report an error
    pub fn report(&self, error: &LogError) {
        self.report_message(&error.to_string(), Some(error));
    }

    /// Report a message, optionally with the error that caused it
    pub fn report_message(&self, message: &str, cause: Option<&LogError>) {
        self.count.fetch_add(1, Ordering::SeqCst);

        let block = self.render_block(message, cause);
        // A panicking console must not take the reporter down with it
        let _ = catch_unwind(AssertUnwindSafe(|| self.console.report(&block)));
    }

    /// Number of reports emitted so far
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn render_block(&self, message: &str, cause: Option<&LogError>) -> String {
        let timestamp = catch_unwind(AssertUnwindSafe(|| iso_string(&self.clock.now())))
            .unwrap_or_else(|_| "unknown time".to_string());

        let mut lines = vec![format!("⚠ {} {}", timestamp, BANNER), message.to_string()];
        if let Some(err) = cause {
            let mut source = err.source();
            while let Some(inner) = source {
                lines.push(format!("    caused by: {}", inner));
                source = inner.source();
            }
        }
        lines.join("\n")
    }
}

impl std::fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("count", &self.count())
            .finish()
    }
}
