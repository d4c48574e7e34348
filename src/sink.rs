// src/sink.rs
//! CSV persistence for completed fixes

use crate::error::Result;
use crate::fix::CompletedFix;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row written exactly once, when the destination is empty.
pub const CSV_HEADER: &str = "timestamp,latitude,longitude,altitude";

/// Appends completed fixes to a CSV log.
///
/// Each append is a fully scoped acquisition: open (creating the file
/// if absent), write, flush, close. The file handle is released on all
/// exit paths. Single producer only.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one fix, writing the header first if the destination was
    /// empty prior to this write.
    pub fn append(&self, fix: &CompletedFix) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", CSV_HEADER)?;
        }

        writeln!(
            file,
            "{},{},{},{}",
            fix.timestamp, fix.latitude, fix.longitude, fix.altitude
        )?;
        file.flush()?;

        Ok(())
    }
}
