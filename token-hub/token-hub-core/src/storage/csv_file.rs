use super::quoting::check_quoting;
use super::{Row, RowStore};
use crate::error::StoreError;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Comma-separated file at a fixed path.
///
/// Rows may have any number of fields; no header handling is applied, so a
/// header line is returned as row 0 like any other. Quoting is checked
/// strictly before parsing and a malformed file yields no rows at all.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Overwrite the backing file with `bytes` exactly as given, creating it
    /// if needed. Nothing is parsed or merged.
    pub fn replace_contents(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let write = || -> io::Result<()> {
            let mut file = File::create(&self.path)?;
            file.write_all(bytes)?;
            file.flush()
        };
        write().map_err(|e| self.write_error(e.into()))
    }

    fn read_error(&self, source: csv::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: csv::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl RowStore for CsvStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Row>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(self.read_error(e.into())),
        };
        check_quoting(&bytes)
            .map_err(|e| self.read_error(io::Error::new(io::ErrorKind::InvalidData, e).into()))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.read_error(e))?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(rows)
    }

    fn write_all(&self, rows: &[Row]) -> Result<(), StoreError> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.write_error(e))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| self.write_error(e.into()))
    }
}
