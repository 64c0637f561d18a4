mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use advisor_ai::gemini::GeminiClient;
use advisor_api::chat;
use advisor_api::service::ChatService;
use advisor_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "advisor=debug,advisor_api=debug,advisor_db=info,advisor_ai=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database and provider client
    let db = Arc::new(Database::open(&config.db_path)?);
    let generator = GeminiClient::new(config.gemini.clone())?;
    info!("Using model {}", generator.model());

    let service = Arc::new(ChatService::new(db, generator));

    let app = chat::router(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr()?;
    info!("Advisor server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
