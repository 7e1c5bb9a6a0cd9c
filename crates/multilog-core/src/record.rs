//! Persisted file records
//!
//! One compact JSON object per line, terminated by `\r\n`:
//!
//! ```text
//! {"timestamp":"2024-03-09T14:05:07.000Z","level":"info","domain":"db","args":["connected",3]}
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{FileTarget, GlobalOptions};
use crate::error::LogResult;
use crate::format::date::{iso_date, DateFormatter};
use crate::level::ResolvedLevel;
use crate::value::LogValue;

/// Line terminator of persisted records
pub const RECORD_TERMINATOR: &str = "\r\n";

/// One persisted log entry
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord<'a> {
    pub timestamp: String,
    pub level: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<&'a str>,
    /// The full payload, trace element included
    pub args: &'a [LogValue],
}

/// A serialized record and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub line: String,
}

/// Builds records and target paths
#[derive(Clone, Debug)]
pub struct FileRecordBuilder {
    directory: Option<PathBuf>,
    extension: String,
    dates: DateFormatter,
}

impl FileRecordBuilder {
    pub fn new(options: &GlobalOptions, dates: DateFormatter) -> Self {
        Self {
            directory: options.output_directory.path().map(Path::to_path_buf),
            extension: options.output_file_extension.trim_start_matches('.').to_string(),
            dates,
        }
    }

    /// Target path for `level` on the day of `now`
    ///
    /// `log-YYYY-MM-DD.<ext>` for shared files, `<label>-log-YYYY-MM-DD.<ext>`
    /// for dedicated ones. `None` if file output is disabled globally.
    pub fn target_path(&self, level: &ResolvedLevel, now: &DateTime<Utc>) -> Option<PathBuf> {
        let directory = self.directory.as_ref()?;
        let stem = match level.definition.file {
            FileTarget::Dedicated(_) => format!("{}-log-{}", level.label(), iso_date(now)),
            _ => format!("log-{}", iso_date(now)),
        };

        let file_name = if self.extension.is_empty() {
            stem
        } else {
            format!("{}.{}", stem, self.extension)
        };
        Some(directory.join(file_name))
    }

    /// Serialize one record, terminator included
    pub fn serialize(
        &self,
        level: &ResolvedLevel,
        domain: Option<&str>,
        payload: &[LogValue],
        now: &DateTime<Utc>,
    ) -> LogResult<String> {
        let record = FileRecord {
            timestamp: self.dates.format(now),
            level: level.label(),
            domain: domain.filter(|d| !d.is_empty()),
            args: payload,
        };
        let mut line = serde_json::to_string(&record)?;
        line.push_str(RECORD_TERMINATOR);
        Ok(line)
    }

    /// Path and line for one call, or `None` if the level does not write files
    pub fn build(
        &self,
        level: &ResolvedLevel,
        domain: Option<&str>,
        payload: &[LogValue],
        now: &DateTime<Utc>,
    ) -> LogResult<Option<PendingWrite>> {
        if !level.writes_file {
            return Ok(None);
        }
        let Some(path) = self.target_path(level, now) else {
            return Ok(None);
        };

        let line = self.serialize(level, domain, payload, now)?;
        Ok(Some(PendingWrite { path, line }))
    }
}
