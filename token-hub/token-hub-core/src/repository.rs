//! Token operations on top of a [`RowStore`].
//!
//! Every call re-reads the whole backing store and every mutation rewrites
//! it in full. The repository itself holds no lock; callers that share one
//! repository between threads decide how mutations are serialized.

use crate::error::{Operation, RepositoryError, StoreError};
use crate::record::{decode_all, TokenRecord};
use crate::storage::{CsvStore, Row, RowStore};

pub struct TokenRepository<S = CsvStore> {
    store: S,
}

impl<S: RowStore> TokenRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All decodable records in file order.
    pub fn list_all(&self) -> Result<Vec<TokenRecord>, RepositoryError> {
        let rows = self.read(Operation::ListAll)?;
        Ok(decode_all(rows))
    }

    /// Records whose project name equals `project_name` exactly. No match is
    /// an empty result, not an error.
    pub fn list_by_project(
        &self,
        project_name: &str,
    ) -> Result<Vec<TokenRecord>, RepositoryError> {
        let rows = self.read(Operation::ListByProject)?;
        Ok(decode_all(rows)
            .into_iter()
            .filter(|record| record.project_name == project_name)
            .collect())
    }

    /// Records of one project, or of every project when `None`.
    pub fn list(&self, project_name: Option<&str>) -> Result<Vec<TokenRecord>, RepositoryError> {
        match project_name {
            Some(name) => self.list_by_project(name),
            None => self.list_all(),
        }
    }

    /// Add `record` as the last row. The backing store must already exist.
    pub fn append(&self, record: TokenRecord) -> Result<(), RepositoryError> {
        let mut rows = self.read(Operation::Append)?;
        rows.push(record.into_row());
        self.write(Operation::Append, &rows)
    }

    /// Drop every row of `project_name` and append `records` at the tail in
    /// the given order. Rows of other projects keep their relative order.
    pub fn replace_project(
        &self,
        project_name: &str,
        records: Vec<TokenRecord>,
    ) -> Result<(), RepositoryError> {
        let rows = self.read(Operation::ReplaceProject)?;
        let mut kept: Vec<Row> = rows
            .into_iter()
            .filter(|row| row.first().map(String::as_str) != Some(project_name))
            .collect();
        kept.extend(records.into_iter().map(TokenRecord::into_row));
        self.write(Operation::ReplaceProject, &kept)
    }

    /// Remove the raw row at `index` (a header row counts as index 0) and
    /// return it.
    pub fn delete_at(&self, index: i64) -> Result<Row, RepositoryError> {
        let mut rows = self.read(Operation::DeleteAt)?;
        let len = rows.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or_else(|| {
                RepositoryError::new(
                    Operation::DeleteAt,
                    StoreError::OutOfRange {
                        path: self.store.path().to_path_buf(),
                        index,
                        len,
                    },
                )
            })?;
        let removed = rows.remove(position);
        tracing::debug!(index, remaining = rows.len(), "deleting token row");
        self.write(Operation::DeleteAt, &rows)?;
        Ok(removed)
    }

    fn read(&self, op: Operation) -> Result<Vec<Row>, RepositoryError> {
        self.store
            .read_all()
            .map_err(|e| RepositoryError::new(op, e))
    }

    fn write(&self, op: Operation, rows: &[Row]) -> Result<(), RepositoryError> {
        self.store
            .write_all(rows)
            .map_err(|e| RepositoryError::new(op, e))
    }
}
