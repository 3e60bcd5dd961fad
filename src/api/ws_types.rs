use serde::Serialize;

use crate::models::TradeView;

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "trade_created")]
    TradeCreated(TradeView),
}
