//! Database row types. Kept apart from the advisor-types models so the
//! storage encoding (text timestamps, text roles) stays in this crate.
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

use advisor_types::models::{ChatTurn, Role};

pub struct TurnRow {
    pub seq: i64,
    pub role: String,
    pub message: String,
    pub timestamp: String,
}

impl TurnRow {
    pub fn into_turn(self) -> Result<ChatTurn> {
        let role: Role = self
            .role
            .parse()
            .map_err(|e| anyhow!("Corrupt role on turn {}: {}", self.seq, e))?;

        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| anyhow!("Corrupt timestamp '{}' on turn {}: {}", self.timestamp, self.seq, e))?;

        Ok(ChatTurn {
            role,
            message: self.message,
            timestamp,
        })
    }
}
