use tokio::sync::broadcast;

use options_journal::api::router::create_router;
use options_journal::api::ws_types::WsMessage;
use options_journal::config::AppConfig;
use options_journal::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    if config.run_migrations {
        db::run_migrations(&db).await?;
        tracing::info!("Migrations applied");
    }

    let metrics_handle = metrics::init_metrics()?;

    if !config.has_api_auth() {
        tracing::warn!("API_TOKEN not set — API authentication disabled");
    }
    tracing::info!(
        require_expiration_date = config.validation.require_expiration_date,
        require_fees = config.validation.require_fees,
        require_date_closed_when_closed = config.validation.require_date_closed_when_closed,
        "Trade validation policy"
    );

    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);

    let state = AppState {
        db,
        config,
        ws_tx,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
