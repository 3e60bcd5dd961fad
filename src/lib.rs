pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;

use tokio::sync::broadcast;

use crate::api::ws_types::WsMessage;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub ws_tx: broadcast::Sender<WsMessage>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
