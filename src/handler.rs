/// Database Handler
///
/// `DatabaseHandler` owns one SQLite connection and runs CRUD statements
/// against it. Table names and condition clauses are trusted and placed into
/// the statement text verbatim; row values are always bound as parameters.
///
/// A handler is `Send` but not `Sync`. Share one across threads by wrapping it
/// in a `Mutex`, or open one handler per thread.

use crate::core::db::{self, ConnectionParams, Row, Value};
use crate::core::{DbError, Result, WriteOp};
use crate::{sanitize, validation};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::{debug, error};

/// Behavior switches for a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerOptions {
    /// HTML-escape text values of insert and update payloads before binding.
    pub sanitize_on_write: bool,
    /// Create the database file when it does not exist yet.
    pub create_if_missing: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        HandlerOptions {
            sanitize_on_write: true,
            create_if_missing: false,
        }
    }
}

#[derive(Debug)]
pub struct DatabaseHandler {
    conn: Connection,
    options: HandlerOptions,
}

impl DatabaseHandler {
    /// Connects with the four construction parameters and default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbhandler::DatabaseHandler;
    ///
    /// let handler = DatabaseHandler::new("localhost", "app", "secret", ":memory:").unwrap();
    /// assert!(handler.read("sqlite_master", "type = 'table'").unwrap().is_empty());
    /// ```
    pub fn new(host: &str, username: &str, password: &str, database: &str) -> Result<Self> {
        Self::connect(&ConnectionParams::new(host, username, password, database))
    }

    pub fn connect(params: &ConnectionParams) -> Result<Self> {
        Self::with_options(params, HandlerOptions::default())
    }

    /// Opens the connection eagerly.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` when the database cannot be opened,
    /// including a missing file unless `create_if_missing` is set. There is
    /// no retry.
    pub fn with_options(params: &ConnectionParams, options: HandlerOptions) -> Result<Self> {
        let conn = db::open_connection(params, options.create_if_missing)?;
        Ok(DatabaseHandler { conn, options })
    }

    /// The underlying connection, for statements outside the CRUD surface
    /// such as creating tables.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn options(&self) -> HandlerOptions {
        self.options
    }

    pub fn validate_email(value: &str) -> bool {
        validation::validate_email(value)
    }

    pub fn validate_username(value: &str) -> bool {
        validation::validate_username(value)
    }

    pub fn validate_phone_number(value: &str) -> bool {
        validation::validate_phone_number(value)
    }

    pub fn sanitize_data(value: &str) -> String {
        sanitize::sanitize_data(value)
    }

    /// Inserts `row` into `table` and returns the number of rows inserted.
    ///
    /// Columns and bound values follow the row's order. Failures are reported
    /// as a generic `DbError::Write(WriteOp::Insert)`; the cause is logged.
    pub fn insert(&self, table: &str, row: &Row) -> Result<usize> {
        let sql = db::insert_sql(table, row);
        let row = self.prepare_payload(row);
        self.execute_write(WriteOp::Insert, &sql, row.values())
    }

    /// Reads every row of `table`, filtered by `conditions` when non-empty.
    ///
    /// `conditions` is a raw SQL expression placed after `WHERE` as-is.
    /// Failures carry the database message.
    pub fn read(&self, table: &str, conditions: &str) -> Result<Vec<Row>> {
        let sql = db::select_sql(table, conditions);
        self.execute_statement(&sql, &[])
    }

    /// Sets the columns of `row` on every row of `table` matching
    /// `conditions` and returns the number of rows changed.
    pub fn update(&self, table: &str, row: &Row, conditions: &str) -> Result<usize> {
        let sql = db::update_sql(table, row, conditions);
        let row = self.prepare_payload(row);
        self.execute_write(WriteOp::Update, &sql, row.values())
    }

    /// Deletes every row of `table` matching `conditions` and returns the
    /// number of rows removed. Nothing is bound, so any value in
    /// `conditions` must already be literal SQL.
    pub fn delete(&self, table: &str, conditions: &str) -> Result<usize> {
        let sql = db::delete_sql(table, conditions);
        self.execute_write(WriteOp::Delete, &sql, std::iter::empty::<&Value>())
    }

    /// Row id of the most recent successful insert on this connection.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn prepare_payload(&self, row: &Row) -> Row {
        if !self.options.sanitize_on_write {
            return row.clone();
        }
        row.map_values(|value| match value {
            Value::Text(s) => Value::Text(sanitize::sanitize_data(s)),
            other => other.clone(),
        })
    }

    /// Prepares and runs `sql`, collecting every result row.
    ///
    /// Errors keep the underlying database message.
    fn execute_statement(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>> {
        debug!(%sql, "executing statement");

        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params)?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, column) in columns.iter().enumerate() {
                record.set(column.as_str(), Value::from_ref(row.get_ref(i)?));
            }
            result.push(record);
        }

        debug!(row_count = result.len(), "statement returned rows");
        Ok(result)
    }

    fn execute_write<'a, I>(&self, op: WriteOp, sql: &str, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        debug!(%sql, "executing {} statement", op);

        let outcome = self
            .conn
            .prepare(sql)
            .and_then(|mut stmt| stmt.execute(params_from_iter(values)));

        match outcome {
            Ok(affected) => {
                debug!(affected, "write statement completed");
                Ok(affected)
            }
            Err(e) => {
                error!(%sql, error = %e, "{} statement failed", op);
                Err(DbError::Write(op))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::HandlerFixture;

    #[test]
    fn test_insert_then_read_by_condition() {
        let fixture = HandlerFixture::with_users_table();
        let handler = &fixture.handler;

        let row = Row::new().with("name", "Bob").with("email", "b@x.com");
        assert_eq!(handler.insert("users", &row).unwrap(), 1);

        let rows = handler.read("users", "email = 'b@x.com'").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&Value::from("Bob")));
        assert_eq!(rows[0].get("id"), Some(&Value::Integer(handler.last_insert_id())));
    }

    #[test]
    fn test_insert_stores_sanitized_text() {
        let fixture = HandlerFixture::with_users_table();
        let handler = &fixture.handler;

        let row = Row::new()
            .with("name", "<b>O'Neil</b>")
            .with("email", "o@x.com")
            .with("age", 41);
        handler.insert("users", &row).unwrap();

        let rows = handler.read("users", "email = 'o@x.com'").unwrap();
        assert_eq!(
            rows[0].get("name").and_then(Value::as_str),
            Some("&lt;b&gt;O&#039;Neil&lt;/b&gt;")
        );
        assert_eq!(rows[0].get("age"), Some(&Value::Integer(41)));
    }

    #[test]
    fn test_insert_raw_when_sanitizing_disabled() {
        let fixture = HandlerFixture::with_options(HandlerOptions {
            sanitize_on_write: false,
            ..HandlerOptions::default()
        });
        let handler = &fixture.handler;

        let row = Row::new().with("name", "O'Neil & Sons").with("email", "s@x.com");
        handler.insert("users", &row).unwrap();

        let rows = handler.read("users", "email = 's@x.com'").unwrap();
        assert_eq!(rows[0].get("name").and_then(Value::as_str), Some("O'Neil & Sons"));
    }

    #[test]
    fn test_non_text_values_bound_unchanged() {
        let fixture = HandlerFixture::with_users_table();
        let handler = &fixture.handler;

        let row = Row::new()
            .with("name", "Nobody")
            .with("email", None::<String>)
            .with("age", 7);
        handler.insert("users", &row).unwrap();

        let rows = handler.read("users", "name = 'Nobody'").unwrap();
        assert!(rows[0].get("email").map_or(false, Value::is_null));
        assert_eq!(rows[0].get("age").and_then(Value::as_i64), Some(7));
    }

    #[test]
    fn test_options_are_kept() {
        let options = HandlerOptions {
            sanitize_on_write: false,
            create_if_missing: true,
        };
        let fixture = HandlerFixture::with_options(options);
        assert_eq!(fixture.handler.options(), options);
        assert_eq!(
            HandlerFixture::with_users_table().handler.options(),
            HandlerOptions::default()
        );
    }

    #[test]
    fn test_read_without_conditions_returns_all_rows() {
        let fixture = HandlerFixture::with_sample_users();
        let rows = fixture.handler.read("users", "").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].columns().collect::<Vec<_>>(),
            vec!["id", "name", "email", "age"]
        );
    }

    #[test]
    fn test_read_unknown_table_carries_message() {
        let fixture = HandlerFixture::with_users_table();
        let err = fixture.handler.read("nonexistent_table", "").unwrap_err();
        match &err {
            DbError::Statement(_) => {}
            other => panic!("Expected Statement error, got {:?}", other),
        }
        let message = err.to_string();
        assert!(message.starts_with("Error: "));
        assert!(message.contains("no such table"), "{}", message);
    }

    #[test]
    fn test_update_matches_condition_only() {
        let fixture = HandlerFixture::with_sample_users();
        let handler = &fixture.handler;

        let changed = handler
            .update("users", &Row::new().with("name", "Carol"), "id = 1")
            .unwrap();
        assert_eq!(changed, 1);

        let rows = handler.read("users", "id = 1").unwrap();
        assert_eq!(rows[0].get("name").and_then(Value::as_str), Some("Carol"));

        let others = handler.read("users", "id <> 1").unwrap();
        assert!(others
            .iter()
            .all(|row| row.get("name").and_then(Value::as_str) != Some("Carol")));
    }

    #[test]
    fn test_update_sanitizes_values() {
        let fixture = HandlerFixture::with_sample_users();
        let handler = &fixture.handler;

        handler
            .update("users", &Row::new().with("name", "a<b"), "id = 2")
            .unwrap();
        let rows = handler.read("users", "id = 2").unwrap();
        assert_eq!(rows[0].get("name").and_then(Value::as_str), Some("a&lt;b"));
    }

    #[test]
    fn test_delete_removes_matching_rows() {
        let fixture = HandlerFixture::with_sample_users();
        let handler = &fixture.handler;

        assert_eq!(handler.delete("users", "id = 1").unwrap(), 1);
        assert!(handler.read("users", "id = 1").unwrap().is_empty());
        assert_eq!(handler.read("users", "").unwrap().len(), 2);

        assert_eq!(handler.delete("users", "id = 1").unwrap(), 0);
    }

    #[test]
    fn test_write_errors_are_generic() {
        let fixture = HandlerFixture::with_users_table();
        let handler = &fixture.handler;
        let row = Row::new().with("name", "Bob");

        let err = handler.insert("nonexistent_table", &row).unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong while inserting data.");

        let err = handler.update("nonexistent_table", &row, "id = 1").unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong while updating data.");

        let err = handler.delete("nonexistent_table", "id = 1").unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong while deleting data.");
    }

    #[test]
    fn test_constraint_violation_is_generic_write_error() {
        let fixture = HandlerFixture::with_sample_users();
        let row = Row::new().with("name", "Dup").with("email", "alice@example.com");
        match fixture.handler.insert("users", &row) {
            Err(DbError::Write(WriteOp::Insert)) => {}
            other => panic!("Expected insert write error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_conditions() {
        let fixture = HandlerFixture::with_sample_users();
        let result = fixture
            .handler
            .update("users", &Row::new().with("name", "Everyone"), "");
        assert!(matches!(result, Err(DbError::Write(WriteOp::Update))));
        assert_eq!(fixture.handler.read("users", "name = 'Everyone'").unwrap().len(), 0);
    }

    #[test]
    fn test_associated_helpers_delegate() {
        assert!(DatabaseHandler::validate_email("a@b.com"));
        assert!(DatabaseHandler::validate_username("user_1"));
        assert!(DatabaseHandler::validate_phone_number("9712345678"));
        assert_eq!(DatabaseHandler::sanitize_data("<"), "&lt;");
    }
}
