//! Logger configuration
//!
//! - `LevelDefinition`: one named level with its formatting, sink and file policy
//! - `GlobalOptions`: settings shared by every level
//! - `LoggerConfig`: both of the above, loadable from YAML or JSON

mod level;
mod options;
mod file;

pub use level::{ConsoleChannel, CustomRenderer, FileTarget, LevelDefinition, TraceConfig};
pub use options::{DateFn, DateStrategy, GlobalOptions, OutputDirectory};
pub use file::LoggerConfig;
