//! Rendering of console output
//!
//! - `date`: instants to strings, with a safe ISO fallback
//! - `value`: one payload value to plain or color-banded text
//! - `payload`: the full console line of a call
//! - `group`: the group header of traced levels

pub mod date;
pub mod value;
pub mod payload;
pub mod group;

pub use date::{iso_date, iso_string, BuiltinDateMethod, DateFormatter};
pub use value::{Band, ValueFormatter, VALUE_SEPARATOR};
pub use payload::{split_trace, PayloadRenderer, RenderedLine};
pub use group::{GroupRenderer, GROUP_RENDER_ERROR};
