use super::{Row, RowStore};
use crate::error::StoreError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

const MEMORY_PATH: &str = "<memory>";

/// In-process row storage. `None` stands for a backing file that does not
/// exist yet; the first `write_all` creates it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Option<Vec<Row>>>,
}

impl MemoryStore {
    /// Store with no backing content; reads fail with `NotFound`.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Mutex::new(Some(rows)),
        }
    }

    pub fn snapshot(&self) -> Option<Vec<Row>> {
        self.rows.lock().clone()
    }
}

impl RowStore for MemoryStore {
    fn path(&self) -> &Path {
        Path::new(MEMORY_PATH)
    }

    fn read_all(&self) -> Result<Vec<Row>, StoreError> {
        self.rows.lock().clone().ok_or_else(|| StoreError::NotFound {
            path: PathBuf::from(MEMORY_PATH),
        })
    }

    fn write_all(&self, rows: &[Row]) -> Result<(), StoreError> {
        *self.rows.lock() = Some(rows.to_vec());
        Ok(())
    }
}
