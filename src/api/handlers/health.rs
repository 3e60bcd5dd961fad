use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::db::trade_repo;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match trade_repo::count_trades(&state.db).await {
        Ok(trades) => {
            metrics::gauge!(crate::metrics::TRADES_STORED).set(trades as f64);
            (StatusCode::OK, Json(json!({ "status": "healthy", "trades": trades })))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "db": "disconnected" })),
            )
        }
    }
}
