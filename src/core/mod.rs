/// Core Module for dbhandler
///
/// Shared infrastructure used by the handler: the error type and the
/// database layer (connection opening, values, rows and statement text).

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{DbError, Result, WriteOp};
