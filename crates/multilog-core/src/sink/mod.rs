//! Output sinks
//!
//! The dispatch pipeline only composes strings and records; these traits are
//! the opaque primitives that actually write them somewhere.
//!
//! - `StdConsole`: stdout/stderr with console-style group indentation
//! - `NoopConsole`: discards everything
//! - `FsFileSink`: append-or-create file writes
//! - `MemoryConsole` / `MemoryFileSink`: in-memory capture for tests and embedding

mod traits;
mod console;
mod noop;
mod file;
mod memory;

pub use traits::{ConsoleSink, FileSink, SharedConsole, SharedFileSink};
pub use console::StdConsole;
pub use noop::NoopConsole;
pub use file::FsFileSink;
pub use memory::{ConsoleEvent, FileWrite, MemoryConsole, MemoryFileSink};
