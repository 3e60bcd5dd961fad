use sqlx::PgPool;

use crate::analytics::apr::compute_apr;
use crate::models::{NewTrade, OptionsTrade};

/// Insert a trade and store its APR.
///
/// The APR is computed from the row as persisted, so it is measured from the
/// server-assigned `created_at` and matches what `compute_apr` yields later
/// for the same row.
pub async fn insert_trade(pool: &PgPool, new: &NewTrade) -> anyhow::Result<OptionsTrade> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query_as::<_, OptionsTrade>(
        r#"
        INSERT INTO options_trades
            (symbol, option_type, strike_price, expiration_date, premium,
             contracts, action, status, fees, date_closed)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&new.symbol)
    .bind(new.option_type.as_str())
    .bind(new.strike_price)
    .bind(new.expiration_date)
    .bind(new.premium)
    .bind(new.contracts)
    .bind(new.action.as_str())
    .bind(new.status.as_str())
    .bind(new.fees)
    .bind(new.date_closed)
    .fetch_one(&mut *tx)
    .await?;

    let trade = match compute_apr(&inserted) {
        Some(apr) => {
            sqlx::query_as::<_, OptionsTrade>(
                "UPDATE options_trades SET apr = $2 WHERE id = $1 RETURNING *",
            )
            .bind(inserted.id)
            .bind(apr)
            .fetch_one(&mut *tx)
            .await?
        }
        None => inserted,
    };

    tx.commit().await?;

    tracing::debug!(
        id = %trade.id,
        symbol = %trade.symbol,
        status = %trade.status,
        apr = ?trade.apr,
        "Trade inserted"
    );

    Ok(trade)
}

/// All trades, newest first.
pub async fn list_trades(pool: &PgPool) -> anyhow::Result<Vec<OptionsTrade>> {
    let trades = sqlx::query_as::<_, OptionsTrade>(
        "SELECT * FROM options_trades ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(trades)
}

/// Count stored trades.
pub async fn count_trades(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM options_trades")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
