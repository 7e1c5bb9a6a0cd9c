//! Date formatting strategies

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};

use crate::config::DateStrategy;
use crate::error::{LogError, LogResult};
use crate::report::ErrorReporter;

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso_string(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// `YYYY-MM-DD` (UTC), used in log file names
pub fn iso_date(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Built-in named strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinDateMethod {
    IsoString,
    UtcString,
    String,
    DateString,
    TimeString,
    LocaleString,
    LocaleDateString,
    LocaleTimeString,
}

impl FromStr for BuiltinDateMethod {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "toISOString" | "toJSON" => BuiltinDateMethod::IsoString,
            "toUTCString" | "toGMTString" => BuiltinDateMethod::UtcString,
            "toString" => BuiltinDateMethod::String,
            "toDateString" => BuiltinDateMethod::DateString,
            "toTimeString" => BuiltinDateMethod::TimeString,
            "toLocaleString" => BuiltinDateMethod::LocaleString,
            "toLocaleDateString" => BuiltinDateMethod::LocaleDateString,
            "toLocaleTimeString" => BuiltinDateMethod::LocaleTimeString,
            other => return Err(LogError::InvalidDateStrategy(other.to_string())),
        })
    }
}

impl BuiltinDateMethod {
    pub fn apply(&self, instant: &DateTime<Utc>) -> String {
        let local = instant.with_timezone(&Local);
        match self {
            BuiltinDateMethod::IsoString => iso_string(instant),
            BuiltinDateMethod::UtcString => instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            BuiltinDateMethod::String => local.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
            BuiltinDateMethod::DateString => local.format("%a %b %d %Y").to_string(),
            BuiltinDateMethod::TimeString => local.format("%H:%M:%S GMT%z").to_string(),
            BuiltinDateMethod::LocaleString => local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            BuiltinDateMethod::LocaleDateString => local.format("%-m/%-d/%Y").to_string(),
            BuiltinDateMethod::LocaleTimeString => local.format("%-I:%M:%S %p").to_string(),
        }
    }
}

/// Renders instants with the configured strategy
///
/// Formatting never fails from the caller's point of view: an unknown name or
/// a failing injected function is reported and the ISO strategy is used.
#[derive(Clone, Debug)]
pub struct DateFormatter {
    strategy: DateStrategy,
    reporter: ErrorReporter,
}

impl DateFormatter {
    pub fn new(strategy: DateStrategy, reporter: ErrorReporter) -> Self {
        Self { strategy, reporter }
    }

    /// Format with the configured strategy, without fallback
    pub fn try_format(&self, instant: &DateTime<Utc>) -> LogResult<String> {
        match &self.strategy {
            DateStrategy::Named(name) => Ok(name.parse::<BuiltinDateMethod>()?.apply(instant)),
            DateStrategy::Custom(f) => match catch_unwind(AssertUnwindSafe(|| f(instant))) {
                Ok(Ok(s)) => Ok(s),
                Ok(Err(e)) => Err(LogError::DateFormat(e.to_string())),
                Err(payload) => Err(LogError::DateFormat(LogError::from_panic(payload).to_string())),
            },
        }
    }

    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        self.try_format(instant).unwrap_or_else(|err| {
            self.reporter.report(&err);
            iso_string(instant)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::sink::MemoryConsole;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn formatter(strategy: DateStrategy) -> (DateFormatter, Arc<MemoryConsole>) {
        let console = Arc::new(MemoryConsole::new());
        let reporter = ErrorReporter::new(console.clone(), Arc::new(FixedClock(instant())));
        (DateFormatter::new(strategy, reporter), console)
    }

    #[test]
    fn test_iso_default() {
        let (formatter, console) = formatter(DateStrategy::default());
        assert_eq!(formatter.format(&instant()), "2024-03-09T14:05:07.000Z");
        assert!(console.reports().is_empty());
    }

    #[test]
    fn test_utc_string() {
        let (formatter, _) = formatter(DateStrategy::named("toUTCString"));
        assert_eq!(formatter.format(&instant()), "Sat, 09 Mar 2024 14:05:07 GMT");
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(iso_date(&instant()), "2024-03-09");
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let (formatter, console) = formatter(DateStrategy::named("toFancyString"));
        assert_eq!(formatter.format(&instant()), "2024-03-09T14:05:07.000Z");

        let reports = console.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("Invalid date strategy: toFancyString"));
    }

    #[test]
    fn test_custom_function() {
        let (formatter, _) = formatter(DateStrategy::custom(|d| Ok(d.format("%H:%M").to_string())));
        assert_eq!(formatter.format(&instant()), "14:05");
    }

    #[test]
    fn test_failing_custom_function_falls_back() {
        let (formatter, console) = formatter(DateStrategy::custom(|_| Err("clock exploded".into())));
        assert_eq!(formatter.format(&instant()), "2024-03-09T14:05:07.000Z");
        assert!(console.reports()[0].contains("clock exploded"));
    }

    #[test]
    fn test_panicking_custom_function_falls_back() {
        let (formatter, console) = formatter(DateStrategy::custom(|_| panic!("no dates today")));
        assert_eq!(formatter.format(&instant()), "2024-03-09T14:05:07.000Z");
        assert!(console.reports()[0].contains("no dates today"));
    }

    #[test]
    fn test_local_strategies_produce_output() {
        for name in ["toString", "toDateString", "toTimeString", "toLocaleString", "toLocaleDateString", "toLocaleTimeString"] {
            let (formatter, console) = formatter(DateStrategy::named(name));
            assert!(!formatter.format(&instant()).is_empty());
            assert!(console.reports().is_empty(), "{} should be a known strategy", name);
        }
    }
}
