use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (conversations + turns)");
        conn.execute_batch(
            "
            CREATE TABLE conversations (
                user_id     TEXT PRIMARY KEY,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            -- seq is the append order; AUTOINCREMENT never reuses a value
            CREATE TABLE turns (
                seq         INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     TEXT NOT NULL REFERENCES conversations(user_id),
                role        TEXT NOT NULL CHECK (role IN ('user', 'ai')),
                message     TEXT NOT NULL,
                timestamp   TEXT NOT NULL
            );

            CREATE INDEX idx_turns_user
                ON turns(user_id, seq);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
