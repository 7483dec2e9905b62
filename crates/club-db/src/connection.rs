use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection as SqlConnection,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::schema;

/// Removes a throwaway test database when dropped
struct TestHandle {
    filename: String,
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        let path = Path::new(&self.filename);
        if path.exists() {
            let _ = fs::remove_file(path);
        }
    }
}

/// A thread safe connection to the database
pub struct Connection {
    conn: Arc<Mutex<SqliteConnection>>,
    _handle: Option<TestHandle>,
}

impl Connection {
    /// Open a connection to the database.
    /// The database file is created if it does not exist yet.
    pub async fn open(filename: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(filename)?
            .create_if_missing(true)
            .foreign_keys(true);
        let conn = SqliteConnection::connect_with(&opts).await?;
        tracing::debug!(filename, "opened database");
        Ok(Connection {
            conn: Arc::new(Mutex::new(conn)),
            _handle: None,
        })
    }

    /// Open a new test database connection.
    /// The database will be created on each open and removed
    /// when the connection is dropped.
    pub async fn open_test() -> Self {
        let filename = format!("/tmp/club_test_{}.sqlite3", rand::random::<u64>());
        let mut conn = Self::open(&filename).await.unwrap();
        conn._handle = Some(TestHandle { filename });

        // Install the schema
        schema::install(&conn).await.unwrap();
        conn
    }

    pub async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().await
    }
}
