/// # Test Utilities Module
///
/// Fixtures shared by the unit tests: an in-memory handler with a standard
/// `users` schema, optionally populated with sample rows.

use crate::core::db::ConnectionParams;
use crate::handler::{DatabaseHandler, HandlerOptions};

pub const USERS_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        age INTEGER
    );
";

/// Isolated in-memory handler fixture
pub struct HandlerFixture {
    pub handler: DatabaseHandler,
}

impl HandlerFixture {
    /// Handler over an empty `users` table.
    pub fn with_users_table() -> Self {
        Self::with_options(HandlerOptions::default())
    }

    pub fn with_options(options: HandlerOptions) -> Self {
        let handler = DatabaseHandler::with_options(&ConnectionParams::in_memory(), options)
            .expect("in-memory database should open");
        handler
            .connection()
            .execute_batch(USERS_SCHEMA)
            .expect("users schema should apply");
        HandlerFixture { handler }
    }

    /// Handler over a `users` table holding alice (1), bob (2) and charlie (3).
    pub fn with_sample_users() -> Self {
        let fixture = Self::with_users_table();
        fixture
            .handler
            .connection()
            .execute_batch(
                "
                INSERT INTO users (name, email, age) VALUES ('alice', 'alice@example.com', 28);
                INSERT INTO users (name, email, age) VALUES ('bob', 'bob@example.com', 32);
                INSERT INTO users (name, email, age) VALUES ('charlie', 'charlie@example.com', 25);
            ",
            )
            .expect("sample users should insert");
        fixture
    }
}
