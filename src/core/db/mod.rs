/// Database Module
///
/// The database layer is split into two concerns:
/// - **Connection** (`connection.rs`): connection parameters and the eager open
/// - **Query** (`query.rs`): scalar values, rows and statement text builders
///
/// All operations use `DbError` for error propagation.
pub mod connection;
pub mod query;

pub use connection::*;
pub use query::*;
