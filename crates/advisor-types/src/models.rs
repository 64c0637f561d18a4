use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "ai" => Ok(Role::Ai),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// One message in a conversation. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Stamp a new turn with the current UTC time.
    pub fn now(role: Role, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A user's full conversation, oldest turn first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub user_id: String,
    pub chat_history: Vec<ChatTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let turn = ChatTurn::now(Role::Ai, "hi");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "ai");
        assert_eq!(json["message"], "hi");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn role_parses_from_stored_text() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("ai".parse::<Role>().unwrap(), Role::Ai);
        assert!("type".parse::<Role>().is_err());
    }
}
