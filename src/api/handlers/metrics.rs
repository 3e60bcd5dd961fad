use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use crate::db::trade_repo;
use crate::metrics::TRADES_STORED;
use crate::AppState;

/// Prometheus scrape endpoint. Refreshes the stored-trade gauge first.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    match trade_repo::count_trades(&state.db).await {
        Ok(n) => metrics::gauge!(TRADES_STORED).set(n as f64),
        Err(e) => tracing::warn!(error = %e, "Failed to count trades for metrics"),
    }

    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], state.metrics_handle.render())
}
