use rag_api::api::{create_router, AppState, RagState};
use rag_api::infrastructure::{connect_chatbot, AppConfig};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rag_api=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    info!(
        collection = %config.rag.collection_name,
        provider = %config.llm.provider,
        model = %config.llm.model,
        "Configuration loaded"
    );

    let rag = RagState::from_init(connect_chatbot(&config).await);
    if !rag.is_ready() {
        warn!("Serving in degraded mode: /api/ask will answer 503");
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let app = create_router(AppState::new(config, rag));

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
