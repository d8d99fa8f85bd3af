//! PostgreSQL persistence for `stock` and the `stock_ledger` idempotency guard.

use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::contracts::types::Stock;

pub struct WarehouseRepository {
    pool: PgPool,
}

struct StockRow {
    product_id: i64,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    last_updated: chrono::DateTime<chrono::Utc>,
}

impl From<StockRow> for Stock {
    fn from(row: StockRow) -> Self {
        Stock {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            last_updated: row.last_updated.timestamp(),
        }
    }
}

impl WarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Stock>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT product_id, product_name, quantity, unit_price, last_updated FROM stock
             WHERE quantity > 0 ORDER BY product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                StockRow {
                    product_id: r.get("product_id"),
                    product_name: r.get("product_name"),
                    quantity: r.get("quantity"),
                    unit_price: r.get("unit_price"),
                    last_updated: r.get("last_updated"),
                }
                .into()
            })
            .collect())
    }

    pub async fn get_by_names(&self, product_names: &[String]) -> Result<Vec<Stock>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT product_id, product_name, quantity, unit_price, last_updated FROM stock WHERE product_name = ANY($1)",
        )
        .bind(product_names)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                StockRow {
                    product_id: r.get("product_id"),
                    product_name: r.get("product_name"),
                    quantity: r.get("quantity"),
                    unit_price: r.get("unit_price"),
                    last_updated: r.get("last_updated"),
                }
                .into()
            })
            .collect())
    }

    /// Returns true if `order_id` has already been applied to the ledger.
    pub async fn is_already_applied(&self, order_id: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM stock_ledger WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Decrements stock for each item and marks `order_id` applied, all in
    /// one transaction. The caller is responsible for checking
    /// `is_already_applied` first; this method still guards against a
    /// concurrent duplicate via the ledger's primary key.
    /// Returns `Ok(true)` if the decrement was applied (or already had been,
    /// idempotently), `Ok(false)` if stock is genuinely insufficient — a
    /// permanent failure the caller should not retry.
    pub async fn apply_decrement(
        &self,
        order_id: i64,
        items: &[(i64, i32)],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO stock_ledger (order_id, applied_at) VALUES ($1, NOW()) ON CONFLICT (order_id) DO NOTHING",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            // Another worker already applied this order_id; nothing to do.
            tx.rollback().await?;
            return Ok(true);
        }

        for (product_id, quantity) in items {
            let result = sqlx::query(
                "UPDATE stock SET quantity = quantity - $1, last_updated = NOW()
                 WHERE product_id = $2 AND quantity >= $1",
            )
            .bind(quantity)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(false);
            }
        }

        tx.commit().await?;
        Ok(true)
    }
}
