/// Error Module
///
/// Error types shared by every part of dbhandler. Read paths report the
/// underlying database message; write paths report a fixed message per
/// operation and leave the cause to the log.
use std::fmt;
use thiserror::Error;

/// The write operation that failed, used to word the generic error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            WriteOp::Insert => "inserting",
            WriteOp::Update => "updating",
            WriteOp::Delete => "deleting",
        };
        f.write_str(verb)
    }
}

/// Error type for dbhandler.
///
/// - Connection establishment failures
/// - Statement failures that carry the database message (reads)
/// - Write failures that deliberately do not (insert, update, delete)
/// - Configuration loading
#[derive(Error, Debug)]
pub enum DbError {
    /// The connection could not be opened or probed
    #[error("Connection failed: {0}")]
    Connection(#[source] rusqlite::Error),

    /// A statement failed to prepare or execute
    #[error("Error: {0}")]
    Statement(#[from] rusqlite::Error),

    /// An insert, update or delete failed; the cause is only logged
    #[error("Something went wrong while {0} data.")]
    Write(WriteOp),

    /// Configuration parsing and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use DbError as the error type.
pub type Result<T> = std::result::Result<T, DbError>;
