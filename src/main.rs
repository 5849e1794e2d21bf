//! Parley server binary: load configuration, compose the engine, serve.

use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use parley::adapters::ai::{GroqConfig, GroqTranslator, PassthroughTranslator};
use parley::adapters::websocket::{app_router, AppState, ConnectionManager};
use parley::application::{LifecycleController, MessageRouter, RoomRegistry, TranslationRelay};
use parley::config::AppConfig;
use parley::ports::{ClientSink, Translator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let translator: Arc<dyn Translator> = match config.translation.api_key() {
        Some(key) => {
            tracing::info!(model = %config.translation.model, "using Groq translation provider");
            Arc::new(GroqTranslator::new(
                GroqConfig::new(key)
                    .with_model(config.translation.model.clone())
                    .with_base_url(config.translation.base_url.clone())
                    .with_timeout(config.translation.timeout()),
            ))
        }
        None => {
            tracing::warn!("no Groq API key configured, messages will be relayed untranslated");
            Arc::new(PassthroughTranslator)
        }
    };

    let connections = Arc::new(ConnectionManager::new());
    let sink = Arc::clone(&connections) as Arc<dyn ClientSink>;
    let registry = Arc::new(RoomRegistry::new());
    let lifecycle = Arc::new(LifecycleController::new(
        Arc::clone(&registry),
        Arc::clone(&sink),
        config.rooms.ttl(),
    ));
    let router = Arc::new(MessageRouter::new(
        registry,
        TranslationRelay::new(translator),
        sink,
    ));

    let cors = {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        if origins.is_empty() {
            CorsLayer::permissive()
        } else {
            CorsLayer::new().allow_origin(AllowOrigin::list(origins))
        }
    };

    let app = app_router(AppState {
        connections,
        lifecycle,
        router,
    })
    .layer(TraceLayer::new_for_http())
    .layer(cors);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
