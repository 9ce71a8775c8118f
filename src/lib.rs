// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod handler;
pub mod sanitize;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use crate::core::db::{ConnectionParams, Row, Value};
pub use crate::core::{DbError, Result, WriteOp};
pub use handler::{DatabaseHandler, HandlerOptions};
