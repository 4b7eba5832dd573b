//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to the embedded engine.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred opening or removing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The engine refused to open the backing file.
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// A transaction could not be started.
    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// A bucket table could not be opened or listed.
    #[error("bucket error: {0}")]
    Table(#[from] redb::TableError),

    /// The engine failed while reading or writing pages.
    #[error("engine error: {0}")]
    Engine(#[from] redb::StorageError),

    /// The engine failed to commit a write transaction.
    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// A write primitive was invoked on a read-only transaction.
    #[error("transaction is read-only")]
    ReadOnly,

    /// A bucket name was rejected.
    #[error("invalid bucket: {0}")]
    InvalidBucket(String),
}
