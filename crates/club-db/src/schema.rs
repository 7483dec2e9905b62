use anyhow::Result;

use crate::Connection;

const SCHEMA: &str = include_str!("../db/schema.sql");

/// Install the database schema.
/// All tables are created only if missing, so this can run on
/// every start.
pub async fn install(conn: &Connection) -> Result<()> {
    let mut conn = conn.lock().await;
    tracing::debug!("installing database schema");
    sqlx::raw_sql(SCHEMA).execute(&mut *conn).await?;
    Ok(())
}
