use serde::{Deserialize, Serialize};

// -- Chat --

/// Body of `POST /chat`. Both fields are optional on the wire so that a
/// missing message reaches validation instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitMessageRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Query of `GET /chat`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

// -- Errors --

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 404 body. Uses `message` rather than `error`: an unknown user is an
/// expected state, not a failure.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub message: String,
}
