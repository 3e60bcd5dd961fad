use axum::extract::State;
use axum::Json;

use crate::analytics::TradeSummary;
use crate::db::trade_repo;
use crate::errors::AppError;
use crate::AppState;

use super::trades::ApiResponse;

/// GET /api/summary — aggregate statistics over all trades
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TradeSummary>>, AppError> {
    let trades = trade_repo::list_trades(&state.db).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(TradeSummary::from_trades(&trades)),
        error: None,
    }))
}
