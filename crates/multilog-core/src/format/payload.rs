//! Console line rendering

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};

use super::date::DateFormatter;
use super::value::ValueFormatter;
use crate::config::CustomRenderer;
use crate::error::{LogError, LogResult};
use crate::level::ResolvedLevel;
use crate::report::ErrorReporter;
use crate::value::LogValue;

/// A rendered console line plus the trace element split off the payload
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    pub text: String,
    pub trace: Option<LogValue>,
}

/// Combines prefix, timestamp, domain and body into one console line
#[derive(Clone, Debug)]
pub struct PayloadRenderer {
    values: ValueFormatter,
    dates: DateFormatter,
    reporter: ErrorReporter,
}

impl PayloadRenderer {
    pub fn new(values: ValueFormatter, dates: DateFormatter, reporter: ErrorReporter) -> Self {
        Self {
            values,
            dates,
            reporter,
        }
    }

    /// Render `payload` for `level`
    ///
    /// On a traced level the timestamp and domain are left to the group
    /// header, so the line is just the prefix and the body.
    pub fn render(
        &self,
        level: &ResolvedLevel,
        domain: Option<&str>,
        payload: &[LogValue],
        now: &DateTime<Utc>,
    ) -> RenderedLine {
        let (values, trace) = split_trace(level, payload);
        let body = self.render_body(level, payload, values);

        let mut parts = Vec::with_capacity(4);
        push_non_empty(&mut parts, level.prefix());

        if level.is_traced() {
            parts.push(body);
        } else {
            let decorations = &level.decorations;
            if level.show_timestamp {
                parts.push(decorations.wrap(&self.dates.format(now)));
            }
            if let Some(domain) = domain.filter(|d| !d.is_empty()) {
                parts.push(decorations.wrap(domain));
            }
            parts.push(decorations.wrap_body(body));
        }

        RenderedLine {
            text: parts.join(" "),
            trace,
        }
    }

    fn render_body(&self, level: &ResolvedLevel, payload: &[LogValue], values: &[LogValue]) -> String {
        let Some(renderer) = &level.definition.renderer else {
            return self.values.format_all(values);
        };

        run_custom(renderer, level.label(), payload).unwrap_or_else(|err| {
            self.reporter.report(&err);
            self.values.format_plain(values)
        })
    }
}

/// Split the trace element off a traced level's payload
///
/// Only a payload with more than one element loses its last element.
pub fn split_trace<'a>(level: &ResolvedLevel, payload: &'a [LogValue]) -> (&'a [LogValue], Option<LogValue>) {
    match payload.split_last() {
        Some((last, rest)) if level.is_traced() && payload.len() > 1 => (rest, Some(last.clone())),
        _ => (payload, None),
    }
}

fn run_custom(renderer: &CustomRenderer, label: &str, payload: &[LogValue]) -> LogResult<String> {
    match catch_unwind(AssertUnwindSafe(|| renderer(payload))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(LogError::render(label, e.to_string())),
        Err(panic) => Err(LogError::render(label, LogError::from_panic(panic).to_string())),
    }
}

pub(crate) fn push_non_empty(parts: &mut Vec<String>, text: &str) {
    if !text.is_empty() {
        parts.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{DateStrategy, GlobalOptions, LevelDefinition, TraceConfig};
    use crate::format::value::Band;
    use crate::sink::MemoryConsole;
    use crate::value::ErrorValue;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    struct Fixture {
        renderer: PayloadRenderer,
        reporter: ErrorReporter,
        console: Arc<MemoryConsole>,
    }

    fn fixture(decorate: bool) -> Fixture {
        let console = Arc::new(MemoryConsole::new());
        let reporter = ErrorReporter::new(console.clone(), Arc::new(FixedClock(now())));
        let dates = DateFormatter::new(DateStrategy::default(), reporter.clone());
        let values = ValueFormatter::new(decorate, dates.clone());
        Fixture {
            renderer: PayloadRenderer::new(values, dates, reporter.clone()),
            reporter,
            console,
        }
    }

    fn resolve(f: &Fixture, level: LevelDefinition) -> ResolvedLevel {
        ResolvedLevel::resolve(level, &GlobalOptions::default(), &f.reporter)
    }

    #[test]
    fn test_full_line() {
        let f = fixture(false);
        let level = resolve(&f, LevelDefinition::new("info").with_prefix("[INFO]"));
        let line = f.renderer.render(&level, Some("db"), &crate::payload!["connected", 3], &now());

        assert_eq!(line.text, "[INFO] [2024-03-09T14:05:07.000Z] [db] connected / 3");
        assert!(line.trace.is_none());
    }

    #[test]
    fn test_without_timestamp_or_domain() {
        let f = fixture(false);
        let level = resolve(&f, LevelDefinition::new("info").with_prefix(">").with_timestamps(false));
        let line = f.renderer.render(&level, Some(""), &crate::payload!["hello"], &now());
        assert_eq!(line.text, "> hello");
    }

    #[test]
    fn test_empty_prefix_has_no_leading_space() {
        let f = fixture(false);
        let level = resolve(&f, LevelDefinition::new("info").with_timestamps(false));
        let line = f.renderer.render(&level, None, &crate::payload!["hello"], &now());
        assert_eq!(line.text, "hello");
    }

    #[test]
    fn test_outer_decoration() {
        let f = fixture(false);
        let level = resolve(
            &f,
            LevelDefinition::new("info")
                .with_prefix("!")
                .with_format(["<", ">", "{", "}"]),
        );
        let line = f.renderer.render(&level, Some("api"), &crate::payload!["x"], &now());
        assert_eq!(line.text, "! <2024-03-09T14:05:07.000Z> <api> {x}");
    }

    #[test]
    fn test_decorated_values() {
        let f = fixture(true);
        let level = resolve(&f, LevelDefinition::new("info").with_timestamps(false));
        let line = f.renderer.render(&level, None, &crate::payload![7], &now());
        assert_eq!(line.text, Band::Warning.paint("7"));
    }

    #[test]
    fn test_trace_element_split() {
        let f = fixture(false);
        let level = resolve(
            &f,
            LevelDefinition::new("error").with_prefix("[ERR]").with_trace(TraceConfig::default()),
        );
        let err = LogValue::from(ErrorValue::new("Error", "boom"));
        let line = f.renderer.render(&level, Some("db"), &[LogValue::from("msg"), err.clone()], &now());

        assert_eq!(line.text, "[ERR] msg");
        assert_eq!(line.trace, Some(err));
    }

    #[test]
    fn test_single_value_trace_level_keeps_value() {
        let f = fixture(false);
        let level = resolve(&f, LevelDefinition::new("error").with_trace(TraceConfig::default()));
        let line = f.renderer.render(&level, None, &crate::payload!["only"], &now());

        assert_eq!(line.text, "only");
        assert!(line.trace.is_none());
    }

    #[test]
    fn test_custom_renderer_gets_raw_payload() {
        let f = fixture(true);
        let level = resolve(
            &f,
            LevelDefinition::new("audit")
                .with_timestamps(false)
                .with_trace(TraceConfig::default())
                .with_renderer(|values| Ok(format!("{} raw values", values.len()))),
        );
        let line = f.renderer.render(&level, None, &crate::payload!["a", "b", LogValue::Undefined], &now());

        assert_eq!(line.text, "3 raw values");
        assert_eq!(line.trace, Some(LogValue::Undefined));
    }

    #[test]
    fn test_failing_custom_renderer_falls_back_to_plain() {
        let f = fixture(true);
        let level = resolve(
            &f,
            LevelDefinition::new("audit")
                .with_timestamps(false)
                .with_renderer(|_| Err("renderer broke".into())),
        );
        let line = f.renderer.render(&level, None, &crate::payload![1, "two"], &now());

        assert_eq!(line.text, "1 / two");
        let reports = f.console.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("renderer broke"));
    }

    #[test]
    fn test_panicking_custom_renderer_is_contained() {
        let f = fixture(false);
        let level = resolve(
            &f,
            LevelDefinition::new("audit")
                .with_timestamps(false)
                .with_renderer(|_| panic!("renderer panicked")),
        );
        let line = f.renderer.render(&level, None, &crate::payload!["still here"], &now());

        assert_eq!(line.text, "still here");
        assert!(f.console.reports()[0].contains("renderer panicked"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let f = fixture(true);
        let level = resolve(&f, LevelDefinition::new("info").with_prefix("[I]"));
        let payload = crate::payload![42, vec![1, 2, 3], "x"];

        let first = f.renderer.render(&level, Some("svc"), &payload, &now());
        let second = f.renderer.render(&level, Some("svc"), &payload, &now());
        assert_eq!(first, second);
    }
}
