mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use tower::ServiceExt;

use options_journal::api::ws_types::WsMessage;
use options_journal::models::ValidationPolicy;

async fn build_test_app() -> axum::Router {
    let pool = common::setup_test_db().await;
    let (router, _ws_tx) = common::build_app(pool, common::test_config(None, ValidationPolicy::default()));
    router
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["trades"].is_number());
}

#[tokio::test]
async fn test_create_and_list_trades() {
    let app = build_test_app().await;
    let symbol = common::unique_symbol("api");

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/trades",
            serde_json::json!({
                "symbol": symbol.to_lowercase(),
                "option_type": "CALL",
                "strike_price": "150.00",
                "premium": 200,
                "contracts": "1",
                "action": "SELL",
                "status": "OPEN",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["symbol"], symbol);
    assert_eq!(json["data"]["option_type"], "CALL");
    assert_eq!(json["data"]["apr_display"], "N/A");
    assert!(json["data"]["id"].is_string());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/trades")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    let trades = json["data"].as_array().unwrap();
    assert!(trades.iter().any(|t| t["symbol"] == symbol.as_str()));
}

#[tokio::test]
async fn test_create_closed_trade_stores_apr() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/trades",
            serde_json::json!({
                "symbol": common::unique_symbol("cls"),
                "strike_price": 100,
                "premium": 50,
                "contracts": 2,
                "status": "CLOSED",
                "date_closed": "2099-12-31",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert!(json["data"]["apr"].is_string());
    assert_eq!(json["data"]["apr"], json["data"]["effective_apr"]);
    assert!(json["data"]["apr_display"].as_str().unwrap().ends_with('%'));
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/trades",
            serde_json::json!({ "symbol": "SPY", "premium": "1.25" }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "strike_price is required");
}

#[tokio::test]
async fn test_create_rejects_date_closed_on_open_trade() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/trades",
            serde_json::json!({
                "symbol": "SPY",
                "strike_price": "400",
                "premium": "3.10",
                "date_closed": "2024-01-31",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_strict_policy_requires_expiration() {
    let pool = common::setup_test_db().await;
    let (app, _) = common::build_app(pool, common::test_config(None, ValidationPolicy::strict()));

    let resp = app
        .oneshot(post_json(
            "/api/trades",
            serde_json::json!({
                "symbol": "QQQ",
                "strike_price": "350",
                "premium": "4",
                "fees": "0.65",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["error"], "expiration_date is required");
}

#[tokio::test]
async fn test_preview_apr_uses_given_creation_time() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/trades/preview-apr",
            serde_json::json!({
                "symbol": "AAPL",
                "strike_price": "150.00",
                "premium": "200.00",
                "fees": "2.50",
                "status": "CLOSED",
                "date_closed": "2024-01-31",
                "created_at": "2024-01-01T00:00:00Z",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["days_held"], 30);
    assert_eq!(json["data"]["apr_display"], "16.02%");
    let capital: Decimal = json["data"]["capital_required"].as_str().unwrap().parse().unwrap();
    assert_eq!(capital, Decimal::from(15_000));
}

#[tokio::test]
async fn test_summary() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["total_trades"].is_number());
    assert!(json["data"]["open"].is_number());
    assert!(json["data"]["net_premium"].is_string());
}

#[tokio::test]
async fn test_auth_required_when_token_set() {
    let pool = common::setup_test_db().await;
    let (app, _) = common::build_app(pool, common::test_config(Some("s3cret"), ValidationPolicy::default()));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/trades")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Unauthorized");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/summary")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Unauthorized");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/trades")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Health stays public
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_created_trade_is_broadcast() {
    let pool = common::setup_test_db().await;
    let (app, ws_tx) = common::build_app(pool, common::test_config(None, ValidationPolicy::default()));
    let mut rx = ws_tx.subscribe();
    let symbol = common::unique_symbol("ws");

    let resp = app
        .oneshot(post_json(
            "/api/trades",
            serde_json::json!({
                "symbol": symbol,
                "strike_price": "42",
                "premium": "1.10",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let WsMessage::TradeCreated(view) = rx.try_recv().unwrap();
    assert_eq!(view.trade.symbol, symbol);

    let json = serde_json::to_value(WsMessage::TradeCreated(view)).unwrap();
    assert_eq!(json["type"], "trade_created");
    assert_eq!(json["data"]["symbol"], symbol.as_str());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    // The only test in this binary that installs the global recorder.
    let handle = options_journal::metrics::init_metrics().unwrap();
    let pool = common::setup_test_db().await;
    let (app, _) = common::build_app_with_metrics(
        pool,
        common::test_config(None, ValidationPolicy::default()),
        handle,
    );

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("trades_stored"));
    assert!(text.contains("trades_created_total"));
}

#[tokio::test]
async fn test_store_failure_returns_error_body() {
    let (app, _) = common::build_app(
        common::unreachable_pool(),
        common::test_config(None, ValidationPolicy::default()),
    );

    for uri in ["/api/trades", "/api/summary"] {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_preview_reports_capital_for_large_positions() {
    let app = build_test_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/trades/preview-apr",
            serde_json::json!({
                "symbol": "BRK",
                "strike_price": "1000000000",
                "premium": "1000000000",
                "contracts": 1000000,
                "status": "CLOSED",
                "date_closed": "2024-01-31",
                "created_at": "2024-01-01T00:00:00Z",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let capital: Decimal = json["data"]["capital_required"].as_str().unwrap().parse().unwrap();
    assert_eq!(capital, Decimal::from(100_000_000_000_000_000_i64));
    assert!(json["data"]["apr"].is_string());
}
