use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::get,
};
use tracing::debug;

use advisor_ai::TextGenerator;
use advisor_types::api::{HistoryQuery, SubmitMessageRequest};
use advisor_types::models::ConversationRecord;

use crate::error::ApiError;
use crate::service::ChatService;

pub type AppState<G> = Arc<ChatService<G>>;

/// `/chat` routes bound to `service`.
pub fn router<G>(service: AppState<G>) -> Router
where
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/chat", get(get_history::<G>).post(submit_message::<G>))
        .with_state(service)
}

pub async fn submit_message<G: TextGenerator>(
    State(service): State<AppState<G>>,
    payload: Result<Json<SubmitMessageRequest>, JsonRejection>,
) -> Result<Json<ConversationRecord>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    debug!("POST /chat for {:?}", req.user_id);

    let record = service.submit(req.user_id, req.message).await?;
    Ok(Json(record))
}

pub async fn get_history<G: TextGenerator>(
    State(service): State<AppState<G>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ConversationRecord>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadQuery(e.body_text()))?;
    let record = service.fetch_history(query.user_id).await?;
    Ok(Json(record))
}
