mod config;
mod documents;
mod errors;
mod generation;
mod llm_client;
mod locale;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::HttpGateway;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryAttachmentStore, InMemoryDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));
    info!("LLM gateway: {}", config.llm_base_url);

    // Credentials and model ids arrive per request; the gateway client only
    // holds the HTTP connection pool.
    let gateway = Arc::new(HttpGateway::new());

    let state = AppState {
        config: config.clone(),
        gateway,
        documents: Arc::new(InMemoryDocumentStore::new()),
        attachments: Arc::new(InMemoryAttachmentStore::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
