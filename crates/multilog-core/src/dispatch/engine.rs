//! The dispatch engine
//!
//! A call goes through two phases:
//! - `prepare`: render the console line, the group header and the file record
//! - `emit`: hand them to the console sink, then the file sink
//!
//! Synchronous loggers run both inline. Deferred loggers run `prepare` on the
//! caller's thread and queue `emit`. Every step is guarded: a fault is reported
//! and the call continues with whatever output is still possible.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::{ConsoleChannel, GlobalOptions};
use crate::error::{LogError, LogResult};
use crate::format::{DateFormatter, GroupRenderer, PayloadRenderer, RenderedLine, ValueFormatter};
use crate::level::ResolvedLevel;
use crate::record::{FileRecordBuilder, PendingWrite};
use crate::report::ErrorReporter;
use crate::sink::{SharedConsole, SharedFileSink};
use crate::value::LogValue;

/// Everything one call will send to the sinks
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub channel: ConsoleChannel,
    /// Group header, for traced levels
    pub header: Option<String>,
    pub line: String,
    /// Trace element, already filtered for truthiness
    pub trace: Option<LogValue>,
    pub file: Option<PendingWrite>,
}

/// Renders calls and drives the sinks
pub struct Dispatcher {
    console: SharedConsole,
    files: SharedFileSink,
    clock: Arc<dyn Clock>,
    reporter: ErrorReporter,
    payload: PayloadRenderer,
    group: GroupRenderer,
    records: FileRecordBuilder,
}

impl Dispatcher {
    pub fn new(
        options: &GlobalOptions,
        console: SharedConsole,
        files: SharedFileSink,
        clock: Arc<dyn Clock>,
        reporter: ErrorReporter,
    ) -> Self {
        let dates = DateFormatter::new(options.date_strategy.clone(), reporter.clone());
        let values = ValueFormatter::new(options.format_args, dates.clone());

        Self {
            console,
            files,
            clock,
            payload: PayloadRenderer::new(values, dates.clone(), reporter.clone()),
            group: GroupRenderer::new(dates.clone(), reporter.clone()),
            records: FileRecordBuilder::new(options, dates),
            reporter,
        }
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Run a whole call inline
    pub fn dispatch(&self, level: &ResolvedLevel, domain: Option<&str>, payload: &[LogValue]) {
        let emission = self.prepare(level, domain, payload);
        self.emit(emission);
    }

    /// Render a call without touching any sink
    pub fn prepare(&self, level: &ResolvedLevel, domain: Option<&str>, payload: &[LogValue]) -> Emission {
        let domain = domain.filter(|d| !d.is_empty());
        let now = self
            .guard(|| Ok(self.clock.now()))
            .unwrap_or_else(chrono::Utc::now);

        let rendered = self
            .guard(|| Ok(self.payload.render(level, domain, payload, &now)))
            .unwrap_or_else(|| fallback_line(level, payload));

        let header = if level.is_traced() {
            self.guard(|| Ok(self.group.render(level, domain, &now)))
        } else {
            None
        };

        let file = self
            .guard(|| self.records.build(level, domain, payload, &now))
            .flatten();

        Emission {
            channel: level.channel,
            header,
            line: rendered.text,
            trace: rendered.trace.filter(LogValue::is_truthy),
            file,
        }
    }

    /// Send a prepared call to the console, then to the file sink
    pub fn emit(&self, emission: Emission) {
        let Emission {
            channel,
            header,
            line,
            trace,
            file,
        } = emission;

        let grouped = match &header {
            Some(header) => self.guard(|| Ok(self.console.group(header))).is_some(),
            None => false,
        };
        self.guard(|| Ok(self.console.write(channel, &line)));
        if let Some(trace) = &trace {
            self.guard(|| Ok(self.console.trace(trace)));
        }
        if grouped {
            self.guard(|| Ok(self.console.group_end()));
        }

        if let Some(write) = file {
            self.write_file(&write);
        }
    }

    fn write_file(&self, write: &PendingWrite) {
        let result = catch_unwind(AssertUnwindSafe(|| self.files.append(&write.path, &write.line)));
        let err = match result {
            Ok(Ok(())) => return,
            Ok(Err(io)) => LogError::from(io),
            Err(panic) => LogError::from_panic(panic),
        };
        self.reporter.report_message(
            &format!("Failed to write log record to {}: {}", write.path.display(), err),
            Some(&err),
        );
    }

    /// Run `f`, reporting an error or a panic instead of propagating it
    fn guard<T>(&self, f: impl FnOnce() -> LogResult<T>) -> Option<T> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                self.reporter.report(&err);
                None
            }
            Err(panic) => {
                self.reporter.report(&LogError::from_panic(panic));
                None
            }
        }
    }
}

/// Best-effort line when rendering itself failed
fn fallback_line(level: &ResolvedLevel, payload: &[LogValue]) -> RenderedLine {
    let body = payload
        .iter()
        .filter(|v| !v.is_undefined())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(crate::format::VALUE_SEPARATOR);

    let text = match level.prefix() {
        "" => body,
        prefix => format!("{} {}", prefix, body),
    };
    RenderedLine { text, trace: None }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("payload", &self.payload)
            .field("records", &self.records)
            .field("reporter", &self.reporter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{FileTarget, LevelDefinition, TraceConfig};
    use crate::sink::{ConsoleEvent, FileSink, MemoryConsole, MemoryFileSink};
    use crate::value::ErrorValue;
    use chrono::{DateTime, TimeZone, Utc};
    use std::io;
    use std::path::{Path, PathBuf};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    struct Fixture {
        dispatcher: Dispatcher,
        console: Arc<MemoryConsole>,
        files: Arc<MemoryFileSink>,
        options: GlobalOptions,
    }

    fn fixture(options: GlobalOptions) -> Fixture {
        let console = Arc::new(MemoryConsole::new());
        let files = Arc::new(MemoryFileSink::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
        let reporter = ErrorReporter::new(console.clone(), clock.clone());
        let dispatcher = Dispatcher::new(&options, console.clone(), files.clone(), clock, reporter);
        Fixture {
            dispatcher,
            console,
            files,
            options,
        }
    }

    impl Fixture {
        fn level(&self, def: LevelDefinition) -> ResolvedLevel {
            ResolvedLevel::resolve(def, &self.options, self.dispatcher.reporter())
        }
    }

    fn plain_options() -> GlobalOptions {
        GlobalOptions::default()
            .with_format_args(false)
            .with_output_directory("/logs")
    }

    #[test]
    fn test_plain_dispatch() {
        let f = fixture(plain_options());
        let level = f.level(LevelDefinition::new("info").with_prefix("[I]"));
        f.dispatcher.dispatch(&level, Some("db"), &crate::payload!["up"]);

        assert_eq!(
            f.console.events(),
            vec![ConsoleEvent::Line {
                channel: ConsoleChannel::Info,
                text: "[I] [2024-03-09T14:05:07.000Z] [db] up".into()
            }]
        );
        assert!(f.files.is_empty());
    }

    #[test]
    fn test_traced_dispatch() {
        let f = fixture(plain_options());
        let level = f.level(
            LevelDefinition::new("error")
                .with_prefix("[E]")
                .with_file(FileTarget::Shared)
                .with_trace(TraceConfig::new("Stack")),
        );
        let err = LogValue::from(ErrorValue::new("Error", "boom"));
        f.dispatcher
            .dispatch(&level, Some("db"), &[LogValue::from("msg"), err.clone()]);

        assert_eq!(
            f.console.events(),
            vec![
                ConsoleEvent::GroupStart("[2024-03-09T14:05:07.000Z] [db] Stack".into()),
                ConsoleEvent::Line {
                    channel: ConsoleChannel::Error,
                    text: "[E] msg".into()
                },
                ConsoleEvent::Trace(err),
                ConsoleEvent::GroupEnd,
            ]
        );

        let content = f.files.contents("/logs/log-2024-03-09.log");
        let record: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(record["args"][0], "msg");
        assert_eq!(record["args"][1]["message"], "boom");
    }

    #[test]
    fn test_falsy_trace_is_suppressed() {
        let f = fixture(plain_options());
        let level = f.level(LevelDefinition::new("error").with_trace(TraceConfig::default()));
        f.dispatcher
            .dispatch(&level, None, &[LogValue::from("msg"), LogValue::Null]);

        let events = f.console.events();
        assert_eq!(events.len(), 3);
        assert!(!events.iter().any(|e| matches!(e, ConsoleEvent::Trace(_))));
        assert!(f.console.lines()[0].ends_with("msg"));
    }

    #[test]
    fn test_file_written_after_console() {
        let f = fixture(plain_options());
        let level = f.level(
            LevelDefinition::new("audit").with_file(FileTarget::Dedicated("audit".into())),
        );
        let emission = f.dispatcher.prepare(&level, None, &crate::payload!["x", 5]);

        assert!(f.console.events().is_empty());
        assert_eq!(
            emission.file.as_ref().map(|w| w.path.clone()),
            Some(PathBuf::from("/logs/audit-log-2024-03-09.log"))
        );

        f.dispatcher.emit(emission);
        assert_eq!(f.console.lines().len(), 1);
        assert_eq!(f.files.len(), 1);
    }

    struct FailingFiles;

    impl FileSink for FailingFiles {
        fn append(&self, _path: &Path, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"))
        }
    }

    #[test]
    fn test_file_failure_is_reported_not_raised() {
        let console = Arc::new(MemoryConsole::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
        let reporter = ErrorReporter::new(console.clone(), clock.clone());
        let options = plain_options();
        let dispatcher = Dispatcher::new(&options, console.clone(), Arc::new(FailingFiles), clock, reporter.clone());

        let level = ResolvedLevel::resolve(
            LevelDefinition::new("info").with_file(FileTarget::Shared),
            &options,
            &reporter,
        );
        dispatcher.dispatch(&level, None, &crate::payload!["x"]);

        assert_eq!(console.lines().len(), 1);
        let reports = console.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("/logs/log-2024-03-09.log"));
        assert!(reports[0].contains("read-only volume"));
    }

    #[test]
    fn test_fallback_line() {
        let level = ResolvedLevel::resolve(
            LevelDefinition::new("info").with_prefix("[I]"),
            &GlobalOptions::default(),
            &ErrorReporter::new(Arc::new(crate::sink::NoopConsole), Arc::new(FixedClock(now()))),
        );
        let line = fallback_line(&level, &crate::payload!["a", LogValue::Undefined, 2]);
        assert_eq!(line.text, "[I] a / 2");
    }
}
