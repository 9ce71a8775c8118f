/// Connection Module
///
/// Connection parameters and the eager connection open used by the handler.

use crate::core::{DbError, Result};
use rusqlite::{Connection, OpenFlags};
use std::fmt;
use tracing::{debug, info};

/// Path that opens a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// The four values a handler is constructed from.
///
/// `database` names the SQLite file to open. SQLite has no server and no
/// authentication, so `host`, `username` and `password` are carried along but
/// do not take part in opening the connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        ConnectionParams {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Parameters for an in-memory database, mostly useful in tests.
    pub fn in_memory() -> Self {
        ConnectionParams::new("localhost", "", "", IN_MEMORY)
    }
}

// Keep the password out of logs.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Opens the database named by `params` and verifies it is usable.
///
/// SQLite defers reading the file header until the first statement, so a
/// probe query runs here; a file that is not a database fails now instead of
/// on the first CRUD call.
///
/// A missing database file is an error unless `create_if_missing` is set.
/// In-memory databases are always created.
///
/// # Errors
///
/// Returns `DbError::Connection` if the file cannot be opened, is not a
/// database, or rejects the connection pragmas.
pub fn open_connection(params: &ConnectionParams, create_if_missing: bool) -> Result<Connection> {
    debug!(
        host = %params.host,
        username = %params.username,
        database = %params.database,
        "opening database connection"
    );

    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if create_if_missing || params.database == IN_MEMORY {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }

    let conn =
        Connection::open_with_flags(&params.database, flags).map_err(DbError::Connection)?;

    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(DbError::Connection)?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(DbError::Connection)?;

    info!(database = %params.database, "database connection established");
    Ok(conn)
}
