use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::notify::Notifier;
use crate::rounds::RoundReconciler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Round result engine. Holds its own store handle built over `db`.
    pub reconciler: Arc<RoundReconciler>,
    /// Relay-backed when MAIL_RELAY_URL is set, log-only otherwise.
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}
