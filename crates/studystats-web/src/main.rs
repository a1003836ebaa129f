mod error;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use studystats_core::config::StatsConfig;
use studystats_core::storage::{self, Storage};

pub struct AppState {
    pub store: Storage,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studystats_web=info".parse().unwrap()),
        )
        .init();

    let config = StatsConfig::load_or_default(None);

    // One store handle for the lifetime of the process, shared by every
    // concurrent request.
    let store = storage::create_backend(&config)?;

    let state = Arc::new(AppState { store });

    let app = routes::router()
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("{}:{}", config.web.host, config.web.port);
    tracing::info!("studystats-web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
