mod applications;
mod config;
mod db;
mod errors;
mod jobs;
mod models;
mod notify;
mod rounds;
mod routes;
mod state;
mod store;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::notify::{LogNotifier, Notifier, RelayNotifier};
use crate::rounds::RoundReconciler;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobTrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize notifier
    let notifier: Arc<dyn Notifier> = match &config.mail_relay_url {
        Some(url) => {
            info!("Mail relay notifier enabled ({url})");
            Arc::new(RelayNotifier::new(
                url.clone(),
                config.mail_relay_token.clone(),
                config.mail_from.clone(),
            )?)
        }
        None => {
            info!("MAIL_RELAY_URL not set; notices will only be logged");
            Arc::new(LogNotifier)
        }
    };

    // Round engine gets its own store handle over the shared pool
    let store = Arc::new(PgStore::new(db.clone()));
    let reconciler = Arc::new(RoundReconciler::new(store, notifier.clone()));

    let state = AppState {
        db,
        reconciler,
        notifier,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
