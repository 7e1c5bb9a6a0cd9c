//! Filesystem append sink

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use super::traits::FileSink;

/// Appends to files on disk
///
/// Each call opens the target in create+append mode and writes the whole line
/// with a single `write_all`. Directories are not created; a missing directory
/// is reported as an error like any other write failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileSink;

impl FsFileSink {
    pub fn new() -> Self {
        Self
    }
}

impl FileSink for FsFileSink {
    fn append(&self, path: &Path, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}
