//! Dynamically-typed payload values
//!
//! A logging call carries an ordered sequence of [`LogValue`]s. Each value is
//! rendered for the console by the value formatter and persisted verbatim in
//! file records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::format::date::iso_string;

/// A single payload element
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    /// An absent value. Dropped from console output, `null` in file records.
    Undefined,
    /// Explicit null
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<LogValue>),
    /// Plain object
    Object(serde_json::Map<String, serde_json::Value>),
    Date(DateTime<Utc>),
    Error(ErrorValue),
}

impl LogValue {
    /// Whether this value counts as "set" in a condition
    ///
    /// `Undefined`, `Null`, `false`, `0`, `NaN` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            LogValue::Undefined | LogValue::Null => false,
            LogValue::Bool(b) => *b,
            LogValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
            LogValue::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, LogValue::Undefined)
    }

    /// Element string used when an array is comma-joined
    ///
    /// Nullish elements become empty strings and nested arrays flatten, the
    /// way array joining behaves in dynamic languages.
    pub(crate) fn join_string(&self) -> String {
        match self {
            LogValue::Undefined | LogValue::Null => String::new(),
            LogValue::Bool(b) => b.to_string(),
            LogValue::Number(n) => n.to_string(),
            LogValue::String(s) => s.clone(),
            LogValue::Array(items) => join_array(items),
            LogValue::Object(_) => "[object Object]".to_string(),
            LogValue::Date(d) => iso_string(d),
            LogValue::Error(e) => e.to_string(),
        }
    }

    /// Compact JSON form
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "null".to_string())
    }
}

/// Comma-join array elements
pub(crate) fn join_array(items: &[LogValue]) -> String {
    items
        .iter()
        .map(LogValue::join_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Undefined => write!(f, "undefined"),
            LogValue::Null => write!(f, "null"),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Number(n) => write!(f, "{}", n),
            LogValue::String(s) => write!(f, "{}", s),
            LogValue::Array(_) | LogValue::Object(_) => write!(f, "{}", self.to_json()),
            LogValue::Date(d) => write!(f, "{}", iso_string(d)),
            LogValue::Error(e) => {
                write!(f, "{}", e)?;
                if let Some(stack) = &e.stack {
                    write!(f, "\n{}", stack)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for LogValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LogValue::Undefined | LogValue::Null => serializer.serialize_unit(),
            LogValue::Bool(b) => serializer.serialize_bool(*b),
            LogValue::Number(n) => n.serialize(serializer),
            LogValue::String(s) => serializer.serialize_str(s),
            LogValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            LogValue::Object(map) => map.serialize(serializer),
            LogValue::Date(d) => serializer.serialize_str(&iso_string(d)),
            LogValue::Error(e) => e.serialize(serializer),
        }
    }
}

/// An error captured as a payload value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorValue {
    /// Error type name (e.g. "Error", "TypeError")
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorValue {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attach a stack/trace description
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Capture a Rust error, recording its source chain as the stack
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("    caused by: {}", cause));
            source = cause.source();
        }

        Self {
            name: "Error".to_string(),
            message: err.to_string(),
            stack: if chain.is_empty() { None } else { Some(chain.join("\n")) },
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::String(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::String(s)
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(n: $ty) -> Self {
                    LogValue::Number(n.into())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        // Integral floats keep an integer representation so `5.0` persists as `5`
        if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
            LogValue::Number((n as i64).into())
        } else {
            serde_json::Number::from_f64(n)
                .map(LogValue::Number)
                .unwrap_or(LogValue::Null)
        }
    }
}

impl From<f32> for LogValue {
    fn from(n: f32) -> Self {
        LogValue::from(n as f64)
    }
}

impl From<DateTime<Utc>> for LogValue {
    fn from(d: DateTime<Utc>) -> Self {
        LogValue::Date(d)
    }
}

impl From<ErrorValue> for LogValue {
    fn from(e: ErrorValue) -> Self {
        LogValue::Error(e)
    }
}

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(items: Vec<T>) -> Self {
        LogValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogValue::Undefined)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => LogValue::Null,
            serde_json::Value::Bool(b) => LogValue::Bool(b),
            serde_json::Value::Number(n) => LogValue::Number(n),
            serde_json::Value::String(s) => LogValue::String(s),
            serde_json::Value::Array(items) => {
                LogValue::Array(items.into_iter().map(LogValue::from).collect())
            }
            serde_json::Value::Object(map) => LogValue::Object(map),
        }
    }
}

/// Build a payload (`Vec<LogValue>`) from heterogeneous values
///
/// ```
/// use multilog_core::{payload, LogValue};
///
/// let values = payload!["x", 5, true];
/// assert_eq!(values.len(), 3);
/// assert_eq!(values[1], LogValue::from(5));
/// ```
#[macro_export]
macro_rules! payload {
    () => {
        ::std::vec::Vec::<$crate::LogValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::LogValue::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!LogValue::Undefined.is_truthy());
        assert!(!LogValue::Null.is_truthy());
        assert!(!LogValue::from(false).is_truthy());
        assert!(!LogValue::from(0).is_truthy());
        assert!(!LogValue::from("").is_truthy());

        assert!(LogValue::from("x").is_truthy());
        assert!(LogValue::from(-1).is_truthy());
        assert!(LogValue::Array(vec![]).is_truthy());
        assert!(LogValue::from(ErrorValue::new("Error", "boom")).is_truthy());
    }

    #[test]
    fn test_integral_floats_stay_integers() {
        assert_eq!(LogValue::from(5.0).to_json(), "5");
        assert_eq!(LogValue::from(1.5).to_json(), "1.5");
        assert_eq!(LogValue::from(f64::NAN), LogValue::Null);
    }

    #[test]
    fn test_join_string() {
        let nested = LogValue::from(vec![
            LogValue::from(1),
            LogValue::from(vec![2, 3]),
            LogValue::Null,
            LogValue::from(json!({"a": 1})),
        ]);
        assert_eq!(nested.join_string(), "1,2,3,,[object Object]");
    }

    #[test]
    fn test_serialization() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap();
        let values = vec![
            LogValue::Undefined,
            LogValue::from(date),
            LogValue::from(ErrorValue::new("TypeError", "bad")),
        ];
        let encoded = serde_json::to_value(&values).unwrap();
        assert_eq!(
            encoded,
            json!([null, "2024-03-09T12:30:05.000Z", {"name": "TypeError", "message": "bad"}])
        );
    }

    #[test]
    fn test_error_value_from_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let value = ErrorValue::from_error(&io);
        assert_eq!(value.to_string(), "Error: missing file");
        assert!(value.stack.is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(LogValue::from("plain").to_string(), "plain");
        assert_eq!(LogValue::from(json!({"a": [1, 2]})).to_string(), r#"{"a":[1,2]}"#);

        let err = ErrorValue::new("Error", "boom").with_stack("    at main");
        assert_eq!(LogValue::from(err).to_string(), "Error: boom\n    at main");
    }

    #[test]
    fn test_payload_macro() {
        let values = payload!["x", 5, None::<i32>];
        assert_eq!(
            values,
            vec![LogValue::from("x"), LogValue::from(5), LogValue::Undefined]
        );
        assert!(payload![].is_empty());
    }
}
