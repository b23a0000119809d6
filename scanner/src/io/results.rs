// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// THIRD PARTY CRATES
use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::debug;

// LOCAL CRATE
use shared::Freq;

const TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Results could not be persisted. Fatal: continuing would silently drop data.
#[derive(Error, Debug)]
#[error("can't write results file {}: {source}", .path.display())]
pub struct StorageError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl StorageError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Durable destination for completed sweeps.
pub trait ResultsSink {
    /// Column labels, one per plan position. Written once before any row.
    fn write_header(&mut self, labels: &[Freq]) -> Result<(), StorageError>;

    /// Append one completed sweep. Must be durable when this returns.
    fn write_row(
        &mut self,
        timestamp: DateTime<Local>,
        values: &[i32],
    ) -> Result<(), StorageError>;
}

/// Appends results to a plain text file.
///
/// ```text
/// # 88.000000,88.100000,88.200000,
/// 19/10/26 14:02:11 9,48,11,
/// ```
pub struct CsvResults {
    path: PathBuf,
}

impl CsvResults {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file is reopened for every line so a crash loses at most the
    /// line being written.
    fn append(&self, line: &str) -> Result<(), StorageError> {
        let wrap = |e| StorageError::new(&self.path, e);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(wrap)?;
        file.write_all(line.as_bytes()).map_err(wrap)?;
        file.flush().map_err(wrap)?;
        file.sync_all().map_err(wrap)?;
        Ok(())
    }
}

impl ResultsSink for CsvResults {
    fn write_header(&mut self, labels: &[Freq]) -> Result<(), StorageError> {
        debug!("writeResultsHeader: {} columns", labels.len());
        self.append(&format_header(labels))
    }

    fn write_row(
        &mut self,
        timestamp: DateTime<Local>,
        values: &[i32],
    ) -> Result<(), StorageError> {
        debug!("writeResults: {} values", values.len());
        self.append(&format_row(timestamp, values))
    }
}

pub(crate) fn format_header(labels: &[Freq]) -> String {
    let mut line = String::from("# ");
    for freq in labels {
        let _ = write!(line, "{freq},");
    }
    line.push('\n');
    line
}

pub(crate) fn format_row(timestamp: DateTime<Local>, values: &[i32]) -> String {
    let mut line = format!("{} ", timestamp.format(TIMESTAMP_FORMAT));
    for value in values {
        let _ = write!(line, "{value},");
    }
    line.push('\n');
    line
}
