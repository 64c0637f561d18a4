use std::sync::Arc;

use tracing::{debug, error, info, warn};

use advisor_ai::TextGenerator;
use advisor_db::Database;
use advisor_types::GUEST_USER_ID;
use advisor_types::models::{ChatTurn, ConversationRecord, Role};

use crate::error::ApiError;
use crate::locks::UserLocks;

/// Runs the two chat operations against an injected store and generator.
pub struct ChatService<G> {
    db: Arc<Database>,
    generator: G,
    locks: UserLocks,
}

impl<G: TextGenerator> ChatService<G> {
    pub fn new(db: Arc<Database>, generator: G) -> Self {
        Self {
            db,
            generator,
            locks: UserLocks::new(),
        }
    }

    /// Record `message`, ask the generator for a reply, record the reply and
    /// return the updated conversation.
    ///
    /// If the generator fails the user's turn stays stored. Submissions for
    /// the same user run one at a time so each reply directly follows its
    /// prompt.
    pub async fn submit(
        &self,
        user_id: Option<String>,
        message: Option<String>,
    ) -> Result<ConversationRecord, ApiError> {
        let message = match message {
            Some(m) if !m.is_empty() => m,
            _ => return Err(ApiError::Validation),
        };
        let user_id = resolve_user_id(user_id);

        let _guard = self.locks.lock(&user_id).await;

        let turn = ChatTurn::now(Role::User, message.clone());
        self.append(&user_id, turn).await?;

        let reply = match self.generator.generate(&message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Generation failed for user {}; prompt kept in history: {}", user_id, e);
                return Err(e.into());
            }
        };

        self.append(&user_id, ChatTurn::now(Role::Ai, reply)).await?;

        let record = self
            .read(&user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("conversation {} vanished after append", user_id))?;

        info!("User {} now has {} turns", record.user_id, record.chat_history.len());
        Ok(record)
    }

    pub async fn fetch_history(&self, user_id: Option<String>) -> Result<ConversationRecord, ApiError> {
        let user_id = resolve_user_id(user_id);
        match self.read(&user_id).await? {
            Some(record) => Ok(record),
            None => {
                debug!("No conversation for user {}", user_id);
                Err(ApiError::NotFound)
            }
        }
    }

    // Run blocking DB work off the async runtime.

    async fn append(&self, user_id: &str, turn: ChatTurn) -> Result<(), ApiError> {
        let db = self.db.clone();
        let uid = user_id.to_string();
        tokio::task::spawn_blocking(move || db.append_turn(&uid, &turn))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                anyhow::anyhow!("append task failed: {}", e)
            })??;
        Ok(())
    }

    async fn read(&self, user_id: &str) -> Result<Option<ConversationRecord>, ApiError> {
        let db = self.db.clone();
        let uid = user_id.to_string();
        let record = tokio::task::spawn_blocking(move || db.get_history(&uid))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                anyhow::anyhow!("read task failed: {}", e)
            })??;
        Ok(record)
    }
}

/// Requests without an id share the guest conversation. An empty id is a
/// key of its own.
pub fn resolve_user_id(user_id: Option<String>) -> String {
    user_id.unwrap_or_else(|| GUEST_USER_ID.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, StubGenerator};

    fn service(reply: Reply) -> (ChatService<Arc<StubGenerator>>, Arc<StubGenerator>, Arc<Database>) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let stub = Arc::new(StubGenerator::new(reply));
        (ChatService::new(db.clone(), stub.clone()), stub, db)
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[tokio::test]
    async fn submit_records_prompt_then_reply() {
        let (svc, stub, _) = service(Reply::Fixed("hi"));

        let record = svc.submit(some("u1"), some("hello")).await.unwrap();

        assert_eq!(record.user_id, "u1");
        let turns: Vec<(Role, &str)> = record
            .chat_history
            .iter()
            .map(|t| (t.role, t.message.as_str()))
            .collect();
        assert_eq!(turns, vec![(Role::User, "hello"), (Role::Ai, "hi")]);
        assert!(record.chat_history[0].timestamp <= record.chat_history[1].timestamp);
        assert_eq!(stub.calls(), 1);

        let fetched = svc.fetch_history(some("u1")).await.unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn unseen_user_is_not_found() {
        let (svc, _, _) = service(Reply::Fixed("hi"));
        assert!(matches!(svc.fetch_history(some("nobody")).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn empty_or_missing_message_is_rejected_without_side_effects() {
        let (svc, stub, db) = service(Reply::Fixed("hi"));
        svc.submit(some("u1"), some("first")).await.unwrap();
        let before = db.get_history("u1").unwrap().unwrap();

        for message in [None, some("")] {
            let result = svc.submit(some("u1"), message).await;
            assert!(matches!(result, Err(ApiError::Validation)));
        }

        assert_eq!(db.get_history("u1").unwrap().unwrap(), before);
        assert!(db.get_history("guest").unwrap().is_none());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn missing_user_id_uses_guest() {
        let (svc, _, _) = service(Reply::Fixed("hi"));

        let submitted = svc.submit(None, some("hello")).await.unwrap();
        assert_eq!(submitted.user_id, GUEST_USER_ID);

        let fetched = svc.fetch_history(None).await.unwrap();
        assert_eq!(fetched, submitted);
    }

    #[tokio::test]
    async fn empty_user_id_is_not_guest() {
        let (svc, _, db) = service(Reply::Fixed("hi"));

        let record = svc.submit(some(""), some("x")).await.unwrap();

        assert_eq!(record.user_id, "");
        assert_eq!(record.chat_history.len(), 2);
        assert!(db.get_history(GUEST_USER_ID).unwrap().is_none());
        assert!(matches!(svc.fetch_history(None).await, Err(ApiError::NotFound)));
        assert_eq!(svc.fetch_history(some("")).await.unwrap(), record);
    }

    #[tokio::test]
    async fn whitespace_message_is_relayed() {
        let (svc, stub, _) = service(Reply::Fixed("hi"));

        let record = svc.submit(some("u1"), some("   \n")).await.unwrap();

        assert_eq!(record.chat_history[0].message, "   \n");
        assert_eq!(record.chat_history[1].message, "hi");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_keeps_user_turn() {
        let (svc, _, _) = service(Reply::Fail("model overloaded"));

        let err = svc.submit(some("u1"), some("hello")).await.unwrap_err();
        assert_eq!(err.to_string(), "AI API error: HTTP 503: model overloaded");

        let record = svc.fetch_history(some("u1")).await.unwrap();
        assert_eq!(record.chat_history.len(), 1);
        assert_eq!(record.chat_history[0].role, Role::User);
        assert_eq!(record.chat_history[0].message, "hello");
    }

    #[tokio::test]
    async fn history_only_grows() {
        let (svc, _, _) = service(Reply::Fixed("ok"));
        let mut previous: Vec<ChatTurn> = Vec::new();

        for i in 0..5 {
            let record = svc.submit(some("u1"), Some(format!("msg {i}"))).await.unwrap();
            assert_eq!(record.chat_history.len(), previous.len() + 2);
            assert_eq!(&record.chat_history[..previous.len()], previous.as_slice());
            previous = record.chat_history;
        }
    }

    #[tokio::test]
    async fn concurrent_submits_for_one_user_stay_paired() {
        let (svc, _, _) = service(Reply::EchoSlow);

        let (a, b) = tokio::join!(
            svc.submit(some("u1"), some("first")),
            svc.submit(some("u1"), some("second")),
        );
        a.unwrap();
        b.unwrap();

        let history = svc.fetch_history(some("u1")).await.unwrap().chat_history;
        assert_eq!(history.len(), 4);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Ai);
            assert_eq!(pair[1].message, format!("re: {}", pair[0].message));
        }
    }
}
