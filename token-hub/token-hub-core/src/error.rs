//! Error taxonomy shared by the store and the repository.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by a [`RowStore`](crate::storage::RowStore) or by index
/// validation in the repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token file {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read token file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write token file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row index {index} is out of range for {len} rows in {}", .path.display())]
    OutOfRange {
        path: PathBuf,
        index: i64,
        len: usize,
    },
}

/// Coarse classification used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Read,
    Write,
    OutOfRange,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Read => "READ_ERROR",
            ErrorKind::Write => "WRITE_ERROR",
            ErrorKind::OutOfRange => "OUT_OF_RANGE",
        }
    }
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Read { .. } => ErrorKind::Read,
            StoreError::Write { .. } => ErrorKind::Write,
            StoreError::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

/// Repository operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListAll,
    ListByProject,
    Append,
    ReplaceProject,
    DeleteAt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListAll => write!(f, "list all tokens"),
            Operation::ListByProject => write!(f, "list project tokens"),
            Operation::Append => write!(f, "append token"),
            Operation::ReplaceProject => write!(f, "replace project tokens"),
            Operation::DeleteAt => write!(f, "delete token row"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{op} failed")]
pub struct RepositoryError {
    pub op: Operation,
    #[source]
    pub source: StoreError,
}

impl RepositoryError {
    pub(crate) fn new(op: Operation, source: StoreError) -> Self {
        Self { op, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
