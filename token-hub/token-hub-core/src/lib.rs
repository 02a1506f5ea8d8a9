//! CSV-backed storage for project access tokens.

pub mod error;
pub mod record;
pub mod repository;
pub mod storage;

pub use error::{ErrorKind, RepositoryError, StoreError};
pub use record::TokenRecord;
pub use repository::TokenRepository;
pub use storage::{CsvStore, MemoryStore, Row, RowStore};
