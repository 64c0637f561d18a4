use crate::Database;
use crate::models::TurnRow;
use anyhow::Result;
use chrono::SecondsFormat;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use advisor_types::models::{ChatTurn, ConversationRecord};

impl Database {
    // -- Conversations --

    /// Append a turn to `user_id`'s history, creating the conversation on
    /// first use. The upsert and the insert share one transaction.
    pub fn append_turn(&self, user_id: &str, turn: &ChatTurn) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO conversations (user_id) VALUES (?1)",
                [user_id],
            )?;
            tx.execute(
                "INSERT INTO turns (user_id, role, message, timestamp) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    user_id,
                    turn.role.as_str(),
                    turn.message,
                    turn.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )?;
            tx.commit()?;

            debug!("Appended {} turn for user {}", turn.role, user_id);
            Ok(())
        })
    }

    /// Returns `None` when the user has never had a turn appended.
    pub fn get_history(&self, user_id: &str) -> Result<Option<ConversationRecord>> {
        self.with_conn(|conn| query_history(conn, user_id))
    }
}

fn query_history(conn: &Connection, user_id: &str) -> Result<Option<ConversationRecord>> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM conversations WHERE user_id = ?1",
            [user_id],
            |_| Ok(()),
        )
        .optional()?;

    if exists.is_none() {
        return Ok(None);
    }

    let mut stmt = conn.prepare(
        "SELECT seq, role, message, timestamp FROM turns
         WHERE user_id = ?1
         ORDER BY seq ASC",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(TurnRow {
                seq: row.get(0)?,
                role: row.get(1)?,
                message: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let chat_history = rows
        .into_iter()
        .map(TurnRow::into_turn)
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(ConversationRecord {
        user_id: user_id.to_string(),
        chat_history,
    }))
}
