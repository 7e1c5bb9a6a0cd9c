//! Level registry and entry points
//!
//! A [`Logger`] is built once from a [`LoggerConfig`]. Its levels are closed
//! at construction: nothing can be added, removed or changed afterwards. The
//! calling convention (inline or deferred) is also fixed at construction.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{LevelDefinition, LoggerConfig};
use crate::dispatch::{DeferredQueue, Dispatcher};
use crate::error::{LogError, LogResult};
use crate::level::ResolvedLevel;
use crate::report::ErrorReporter;
use crate::sink::{FsFileSink, SharedConsole, SharedFileSink, StdConsole};
use crate::value::LogValue;

/// Output collaborators of a logger
#[derive(Clone)]
pub struct Sinks {
    pub console: SharedConsole,
    pub files: SharedFileSink,
    pub clock: Arc<dyn Clock>,
}

impl Default for Sinks {
    /// stdout/stderr, the real filesystem and the system clock
    fn default() -> Self {
        Self {
            console: Arc::new(StdConsole::new()),
            files: Arc::new(FsFileSink::new()),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Sinks {
    pub fn with_console(mut self, console: SharedConsole) -> Self {
        self.console = console;
        self
    }

    pub fn with_files(mut self, files: SharedFileSink) -> Self {
        self.files = files;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// How entry points run their dispatch
enum Invoker {
    Immediate,
    Deferred(DeferredQueue),
}

/// A configured set of logging levels
///
/// # Example
///
/// ```
/// use multilog_core::{payload, GlobalOptions, LevelDefinition, Logger, LoggerConfig};
///
/// let config = LoggerConfig::default()
///     .with_level(LevelDefinition::new("info").with_prefix("[INFO]"))
///     .with_options(GlobalOptions::default().with_synchronous(true).without_file_output());
///
/// let logger = Logger::new(config).unwrap();
/// logger.call("info", payload!["server started on port", 8080]);
/// logger.with_domain("info", "http", payload!["listening"]);
/// ```
pub struct Logger {
    by_label: HashMap<String, Arc<ResolvedLevel>>,
    by_method: HashMap<String, Arc<ResolvedLevel>>,
    labels: Vec<String>,
    dispatcher: Arc<Dispatcher>,
    invoker: Invoker,
}

impl Logger {
    /// Build a logger writing to stdout/stderr and the filesystem
    pub fn new(config: LoggerConfig) -> LogResult<Self> {
        Self::with_sinks(config, Sinks::default())
    }

    /// Build a logger with explicit sinks
    ///
    /// Invalid level settings are reported and replaced by safe defaults; the
    /// only hard failure is being unable to start the deferred worker.
    pub fn with_sinks(config: LoggerConfig, sinks: Sinks) -> LogResult<Self> {
        let LoggerConfig { mut levels, options } = config;
        if levels.is_empty() {
            levels.push(LevelDefinition::default());
        }

        let reporter = ErrorReporter::new(sinks.console.clone(), sinks.clock.clone());
        let dispatcher = Arc::new(Dispatcher::new(
            &options,
            sinks.console,
            sinks.files,
            sinks.clock,
            reporter.clone(),
        ));

        let mut by_label = HashMap::new();
        let mut by_method = HashMap::new();
        let mut labels = Vec::new();

        // A later definition with the same label or method name replaces the earlier one
        for definition in levels {
            let method = definition.method_name().to_lowercase();
            let level = Arc::new(ResolvedLevel::resolve(definition, &options, &reporter));
            let label = level.label().to_string();

            if !labels.contains(&label) {
                labels.push(label.clone());
            }
            by_label.insert(label, level.clone());
            by_method.insert(method, level);
        }

        let invoker = if options.synchronous {
            Invoker::Immediate
        } else {
            Invoker::Deferred(DeferredQueue::spawn()?)
        };

        Ok(Self {
            by_label,
            by_method,
            labels,
            dispatcher,
            invoker,
        })
    }

    /// Call a level by entry point name (case-insensitive)
    pub fn call(&self, method: &str, payload: Vec<LogValue>) {
        match self.method(method) {
            Some(handle) => handle.log(payload),
            None => self.report(&LogError::UnknownMethod(method.to_string())),
        }
    }

    /// Call a level by its exact label
    pub fn dispatch(&self, label: &str, payload: Vec<LogValue>) {
        match self.by_label.get(label) {
            Some(level) => self.invoke(level, None, payload),
            None => self.report(&LogError::UnknownLevel(label.to_string())),
        }
    }

    /// Call a level by its exact label, tagging the output with `domain`
    pub fn with_domain(&self, label: &str, domain: &str, payload: Vec<LogValue>) {
        match self.by_label.get(label) {
            Some(level) => self.invoke(level, Some(domain), payload),
            None => self.report(&LogError::UnknownLevel(label.to_string())),
        }
    }

    /// The entry point bound to `name` (case-insensitive)
    pub fn method(&self, name: &str) -> Option<LevelHandle<'_>> {
        self.by_method
            .get(&name.to_lowercase())
            .map(|level| LevelHandle {
                logger: self,
                level: level.clone(),
            })
    }

    /// Resolved level by exact label
    pub fn level(&self, label: &str) -> Option<&ResolvedLevel> {
        self.by_label.get(label).map(Arc::as_ref)
    }

    /// Labels in registration order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Entry point names (lowercased)
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.by_method.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_synchronous(&self) -> bool {
        matches!(self.invoker, Invoker::Immediate)
    }

    pub fn reporter(&self) -> &ErrorReporter {
        self.dispatcher.reporter()
    }

    /// Wait until every dispatch issued before this call has reached the sinks
    pub async fn flush(&self) {
        if let Invoker::Deferred(queue) = &self.invoker {
            queue.flush().await;
        }
    }

    /// Blocking variant of [`flush`](Self::flush); not for use inside an async runtime
    pub fn flush_blocking(&self) {
        if let Invoker::Deferred(queue) = &self.invoker {
            queue.flush_blocking();
        }
    }

    fn invoke(&self, level: &Arc<ResolvedLevel>, domain: Option<&str>, payload: Vec<LogValue>) {
        let result = catch_unwind(AssertUnwindSafe(|| match &self.invoker {
            Invoker::Immediate => self.dispatcher.dispatch(level, domain, &payload),
            Invoker::Deferred(queue) => {
                let emission = self.dispatcher.prepare(level, domain, &payload);
                let dispatcher = self.dispatcher.clone();
                // A stopped worker means we run the job ourselves
                if let Err(job) = queue.push(Box::new(move || dispatcher.emit(emission))) {
                    job();
                }
            }
        }));

        if let Err(panic) = result {
            self.report(&LogError::from_panic(panic));
        }
    }

    fn report(&self, err: &LogError) {
        self.dispatcher.reporter().report(err);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("labels", &self.labels)
            .field("synchronous", &self.is_synchronous())
            .finish()
    }
}

/// An entry point bound to one level for the logger's lifetime
#[derive(Clone)]
pub struct LevelHandle<'a> {
    logger: &'a Logger,
    level: Arc<ResolvedLevel>,
}

impl LevelHandle<'_> {
    pub fn log(&self, payload: Vec<LogValue>) {
        self.logger.invoke(&self.level, None, payload);
    }

    pub fn with_domain(&self, domain: &str, payload: Vec<LogValue>) {
        self.logger.invoke(&self.level, Some(domain), payload);
    }

    pub fn label(&self) -> &str {
        self.level.label()
    }
}

impl std::fmt::Debug for LevelHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelHandle")
            .field("label", &self.level.label())
            .finish()
    }
}

/// Call a logger entry point with a list of values
///
/// ```
/// use multilog_core::{log_at, GlobalOptions, Logger, LoggerConfig};
///
/// let config = LoggerConfig::default()
///     .with_options(GlobalOptions::default().with_synchronous(true).without_file_output());
/// let logger = Logger::new(config).unwrap();
/// log_at!(logger, "log", "cache warmed", 128, true);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $method:expr $(, $value:expr)* $(,)?) => {
        $logger.call($method, $crate::payload![$($value),*])
    };
}
