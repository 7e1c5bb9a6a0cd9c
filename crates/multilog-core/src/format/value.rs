//! Per-value payload formatting

use chrono::{DateTime, Utc};

use super::date::DateFormatter;
use crate::value::{join_array, LogValue};

/// Separator between formatted values in a body
pub const VALUE_SEPARATOR: &str = " / ";

/// Color band wrapped around a decorated value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Numbers
    Warning,
    /// Arrays
    Success,
    /// Dates
    Special,
    /// Plain objects
    Info,
}

impl Band {
    fn open(&self) -> &'static str {
        match self {
            Band::Warning => "\x1b[33m",
            Band::Success => "\x1b[32m",
            Band::Special => "\x1b[35m",
            Band::Info => "\x1b[36m",
        }
    }

    /// Wrap `text` in this band
    pub fn paint(&self, text: &str) -> String {
        format!("{}{}\x1b[39m", self.open(), text)
    }
}

/// Renders payload values into body text
#[derive(Clone, Debug)]
pub struct ValueFormatter {
    decorate: bool,
    dates: DateFormatter,
}

impl ValueFormatter {
    pub fn new(decorate: bool, dates: DateFormatter) -> Self {
        Self { decorate, dates }
    }

    /// Render one value; `None` means the value is dropped
    pub fn format_value(&self, value: &LogValue) -> Option<String> {
        self.render(value, self.decorate)
    }

    /// Render and join every value
    pub fn format_all(&self, values: &[LogValue]) -> String {
        join(values.iter().filter_map(|v| self.format_value(v)))
    }

    /// Render and join every value without decoration
    pub fn format_plain(&self, values: &[LogValue]) -> String {
        join(values.iter().filter_map(|v| self.render(v, false)))
    }

    fn render(&self, value: &LogValue, decorate: bool) -> Option<String> {
        let (text, band) = match value {
            LogValue::Undefined => return None,
            LogValue::Number(n) => (n.to_string(), Band::Warning),
            LogValue::Array(items) => (join_array(items), Band::Success),
            LogValue::Date(d) => (self.format_date(d), Band::Special),
            // Errors and primitives are passed through as their own text
            LogValue::Error(e) => return Some(e.to_string()),
            LogValue::String(s) => return Some(s.clone()),
            LogValue::Bool(b) => return Some(b.to_string()),
            LogValue::Object(_) | LogValue::Null => (value.to_json(), Band::Info),
        };

        Some(if decorate { band.paint(&text) } else { text })
    }

    fn format_date(&self, instant: &DateTime<Utc>) -> String {
        self.dates.format(instant)
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(VALUE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::DateStrategy;
    use crate::report::ErrorReporter;
    use crate::sink::NoopConsole;
    use crate::value::ErrorValue;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Arc;

    fn formatter(decorate: bool) -> ValueFormatter {
        let reporter = ErrorReporter::new(Arc::new(NoopConsole), Arc::new(SystemClock));
        ValueFormatter::new(decorate, DateFormatter::new(DateStrategy::default(), reporter))
    }

    fn sample() -> Vec<LogValue> {
        vec![
            LogValue::from(42),
            LogValue::from(vec![1, 2, 3]),
            LogValue::from(json!({"a": 1})),
        ]
    }

    #[test]
    fn test_plain_join() {
        assert_eq!(formatter(false).format_all(&sample()), r#"42 / 1,2,3 / {"a":1}"#);
    }

    #[test]
    fn test_decorated_join() {
        let expected = format!(
            "{} / {} / {}",
            Band::Warning.paint("42"),
            Band::Success.paint("1,2,3"),
            Band::Info.paint(r#"{"a":1}"#)
        );
        assert_eq!(formatter(true).format_all(&sample()), expected);
        assert_eq!(formatter(true).format_plain(&sample()), r#"42 / 1,2,3 / {"a":1}"#);
    }

    #[test]
    fn test_undefined_is_dropped() {
        let values = vec![LogValue::from("a"), LogValue::Undefined, LogValue::from("b")];
        assert_eq!(formatter(true).format_all(&values), "a / b");
    }

    #[test]
    fn test_passthrough_values() {
        let f = formatter(true);
        assert_eq!(f.format_value(&LogValue::from("text")), Some("text".to_string()));
        assert_eq!(f.format_value(&LogValue::from(true)), Some("true".to_string()));

        let err = ErrorValue::new("RangeError", "out of range");
        assert_eq!(
            f.format_value(&LogValue::from(err)),
            Some("RangeError: out of range".to_string())
        );
    }

    #[test]
    fn test_dates() {
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let value = LogValue::from(instant);

        assert_eq!(
            formatter(false).format_value(&value),
            Some("2023-12-31T23:59:59.000Z".to_string())
        );
        assert_eq!(
            formatter(true).format_value(&value),
            Some(Band::Special.paint("2023-12-31T23:59:59.000Z"))
        );
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let f = formatter(true);
        assert_eq!(f.format_all(&sample()), f.format_all(&sample()));
    }
}
