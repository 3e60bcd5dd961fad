use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::apr::{self, capital_required, days_held};
use crate::api::ws_types::WsMessage;
use crate::db::trade_repo;
use crate::errors::AppError;
use crate::metrics::{TRADES_CREATED, TRADE_CREATE_FAILED, TRADE_CREATE_REJECTED, TRADE_LIST_REQUESTS};
use crate::models::{TradeDraft, TradeView};
use crate::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub draft: TradeDraft,
    /// Reference creation time; defaults to now.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct AprPreview {
    pub created_at: DateTime<Utc>,
    pub capital_required: Option<Decimal>,
    pub days_held: Option<i64>,
    pub apr: Option<Decimal>,
    pub apr_display: String,
}

/// GET /api/trades — all trades, newest first
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TradeView>>>, AppError> {
    metrics::counter!(TRADE_LIST_REQUESTS).increment(1);

    let trades = trade_repo::list_trades(&state.db).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(trades.into_iter().map(TradeView::from).collect()),
        error: None,
    }))
}

/// POST /api/trades — validate a draft and store it
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TradeDraft>,
) -> Result<Json<ApiResponse<TradeView>>, AppError> {
    let new_trade = draft.commit(&state.config.validation).map_err(|e| {
        metrics::counter!(TRADE_CREATE_REJECTED).increment(1);
        tracing::info!(error = %e, symbol = %draft.symbol, "Trade draft rejected");
        e
    })?;

    let trade = trade_repo::insert_trade(&state.db, &new_trade)
        .await
        .inspect_err(|e| {
            metrics::counter!(TRADE_CREATE_FAILED).increment(1);
            tracing::error!(error = %e, symbol = %new_trade.symbol, "Failed to insert trade");
        })?;

    metrics::counter!(TRADES_CREATED).increment(1);
    tracing::info!(
        id = %trade.id,
        symbol = %trade.symbol,
        status = %trade.status,
        apr = %apr::format_percentage(trade.apr),
        "Trade created"
    );

    let view = TradeView::from(trade);
    // No subscribers is fine
    let _ = state.ws_tx.send(WsMessage::TradeCreated(view.clone()));

    Ok(Json(ApiResponse {
        success: true,
        data: Some(view),
        error: None,
    }))
}

/// POST /api/trades/preview-apr — APR a draft would get if created at `created_at`
pub async fn preview_apr(
    State(state): State<AppState>,
    Json(body): Json<PreviewRequest>,
) -> Result<Json<ApiResponse<AprPreview>>, AppError> {
    let new_trade = body.draft.commit(&state.config.validation)?;
    let created_at = body.created_at.unwrap_or_else(Utc::now);

    let apr = new_trade.apr_inputs(created_at).compute();

    Ok(Json(ApiResponse {
        success: true,
        data: Some(AprPreview {
            created_at,
            capital_required: capital_required(new_trade.strike_price, new_trade.contracts),
            days_held: new_trade.date_closed.map(|d| days_held(created_at, d)),
            apr,
            apr_display: apr::format_percentage(apr),
        }),
        error: None,
    }))
}
