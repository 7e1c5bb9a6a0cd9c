//! multilog Core
//!
//! A configurable logging facade. Named levels are declared once; each level
//! gets its own entry point, console channel, prefix, decorations and file
//! policy. Every call fans out to the console and, optionally, to a daily
//! JSON-lines file.
//!
//! ## Dispatch
//!
//! - Synchronous loggers render and write inline
//! - Deferred loggers render on the caller's thread and hand the writes to a
//!   single FIFO worker, so calls reach the sinks in the order they were made
//! - A logging call never fails: faults are reported on the error console
//!   and the call does whatever it still can
//!
//! ```rust
//! use multilog_core::{payload, FileTarget, GlobalOptions, LevelDefinition, Logger, LoggerConfig, TraceConfig};
//!
//! let config = LoggerConfig::default()
//!     .with_level(LevelDefinition::new("info").with_prefix("[INFO]"))
//!     .with_level(
//!         LevelDefinition::new("error")
//!             .with_prefix("[ERROR]")
//!             .with_file(FileTarget::Shared)
//!             .with_trace(TraceConfig::default()),
//!     )
//!     .with_options(GlobalOptions::default().with_synchronous(true).without_file_output());
//!
//! let logger = Logger::new(config).unwrap();
//! logger.call("info", payload!["ready"]);
//! logger.with_domain("error", "db", payload!["query failed", "timeout"]);
//! ```

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod level;
pub mod record;
pub mod registry;
pub mod report;
pub mod sink;
pub mod value;

// Re-export commonly used types
pub use error::{BoxError, FaultKind, LogError, LogResult};

pub use value::{ErrorValue, LogValue};

pub use clock::{Clock, FixedClock, SystemClock};

pub use config::{
    ConsoleChannel, CustomRenderer, DateFn, DateStrategy, FileTarget, GlobalOptions,
    LevelDefinition, LoggerConfig, OutputDirectory, TraceConfig,
};

pub use level::{Decorations, ResolvedLevel};

pub use record::{FileRecord, PendingWrite};

pub use registry::{LevelHandle, Logger, Sinks};

pub use report::ErrorReporter;

pub use sink::{
    ConsoleEvent, ConsoleSink, FileSink, FileWrite, FsFileSink, MemoryConsole, MemoryFileSink,
    NoopConsole, SharedConsole, SharedFileSink, StdConsole,
};
