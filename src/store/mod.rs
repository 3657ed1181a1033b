use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Record;

/// File name prefix used for daily record files when none is configured.
pub const DEFAULT_PREFIX: &str = "abq_data_record";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write csv to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("record fields do not match the file columns (expected {expected:?}, got {found:?})")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("{path} already has a different header: {found:?}")]
    HeaderMismatch { path: PathBuf, found: Vec<String> },
}

/// Appends records as rows of one delimited file with a fixed column order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    columns: Vec<String>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    /// Store for one calendar day: `{dir}/{prefix}_{YYYY-MM-DD}.csv`.
    pub fn daily(dir: impl AsRef<Path>, prefix: &str, date: NaiveDate, columns: Vec<String>) -> Self {
        let file_name = format!("{prefix}_{}.csv", date.format("%Y-%m-%d"));
        Self::new(dir.as_ref().join(file_name), columns)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Append one row, writing the header first when the file is new.
    pub fn save_record(&self, record: &Record) -> Result<(), StoreError> {
        let row = self.row_for(record)?;
        let needs_header = self.check_header()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            debug!(path = %self.path.display(), "writing header row");
            writer
                .write_record(&self.columns)
                .map_err(|source| self.csv_error(source))?;
        }
        writer
            .write_record(&row)
            .map_err(|source| self.csv_error(source))?;
        writer.flush().map_err(|source| self.io_error(source))?;

        info!(path = %self.path.display(), "record appended");
        Ok(())
    }

    fn row_for(&self, record: &Record) -> Result<Vec<String>, StoreError> {
        let matches = record.len() == self.columns.len()
            && self.columns.iter().all(|column| record.contains_key(column));
        if !matches {
            return Err(StoreError::ColumnMismatch {
                expected: self.columns.clone(),
                found: record.keys().cloned().collect(),
            });
        }
        Ok(self
            .columns
            .iter()
            .map(|column| record[column].display_string())
            .collect())
    }

    /// Returns whether the header still has to be written.
    fn check_header(&self) -> Result<bool, StoreError> {
        let empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(source) => return Err(self.io_error(source)),
        };
        if empty {
            return Ok(true);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|source| self.csv_error(source))?;
        let header = match reader.records().next() {
            Some(record) => record.map_err(|source| self.csv_error(source))?,
            None => return Ok(true),
        };
        let found: Vec<String> = header.iter().map(str::to_string).collect();
        if found != self.columns {
            return Err(StoreError::HeaderMismatch {
                path: self.path.clone(),
                found,
            });
        }
        Ok(false)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}
