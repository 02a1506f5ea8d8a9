//! Whole-file row storage. Stores are schema-unaware: they read and write
//! sequences of rows and never look inside them.

mod csv_file;
mod memory;
mod quoting;

pub use csv_file::CsvStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use std::path::Path;

/// One persisted line, split into its textual fields.
pub type Row = Vec<String>;

/// Backing storage for the token repository.
///
/// `read_all` returns every row in file order and `write_all` replaces the
/// entire previous content. Neither call is atomic with respect to other
/// writers of the same backing file.
pub trait RowStore {
    /// Location reported in errors.
    fn path(&self) -> &Path;

    fn read_all(&self) -> Result<Vec<Row>, StoreError>;

    fn write_all(&self, rows: &[Row]) -> Result<(), StoreError>;
}
