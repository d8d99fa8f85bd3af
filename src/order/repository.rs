//! PostgreSQL persistence for `orders`, `order_items` and `order_outbox`.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};

use crate::contracts::types::{LineItem, NewLineItem, Order, OrderStatus};

pub struct OrderRepository {
    pool: PgPool,
}

#[derive(Serialize)]
struct OutboxLine {
    product_id: i64,
    quantity: i32,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the order, its line items, and a pending outbox row in one
    /// transaction — the distributed-transaction boundary between OC and WC.
    pub async fn create_with_outbox(
        &self,
        user_id: i64,
        delivery_address: &str,
        items: &[NewLineItem],
    ) -> Result<Order, sqlx::Error> {
        let total: Decimal = items.iter().map(|i| i.total_price()).sum();
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query(
            "INSERT INTO orders (user_id, status, delivery_address, total_amount, driver_id, created_at)
             VALUES ($1, $2, $3, $4, NULL, NOW())
             RETURNING order_id, created_at",
        )
        .bind(user_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(delivery_address)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let order_id: i64 = order_row.get("order_id");
        let created_at: chrono::DateTime<chrono::Utc> = order_row.get("created_at");

        let mut line_items = Vec::with_capacity(items.len());
        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity, total_price)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.total_price())
            .execute(&mut *tx)
            .await?;

            line_items.push(LineItem {
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                total_price: item.total_price(),
            });
        }

        let lines: Vec<OutboxLine> = items
            .iter()
            .map(|i| OutboxLine {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect();
        let lines_json = serde_json::to_value(&lines)
            .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

        sqlx::query(
            "INSERT INTO order_outbox (order_id, lines, status, attempts, created_at)
             VALUES ($1, $2, 'pending', 0, NOW())",
        )
        .bind(order_id)
        .bind(lines_json)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Order {
            order_id,
            user_id,
            status: OrderStatus::Pending,
            delivery_address: delivery_address.to_string(),
            total_amount: total,
            driver_id: None,
            created_at: created_at.timestamp(),
            items: line_items,
        })
    }

    /// Unscoped lookup by id only, for internal bookkeeping that needs to
    /// learn an order's owner before issuing a user-scoped call (the
    /// `driver.found` consumer, the outbox worker) — never exposed to a
    /// caller-supplied order_id from the gateway.
    pub async fn get_by_id(&self, order_id: i64) -> Result<Option<Order>, sqlx::Error> {
        let Some(order_row) = sqlx::query(
            "SELECT order_id, user_id, status, delivery_address, total_amount, driver_id, created_at
             FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = self.get_items(order_id).await?;
        Ok(Some(row_to_order(&order_row, items)))
    }

    /// Scoped lookup: an order belonging to a different user is reported
    /// the same as a nonexistent one.
    pub async fn get_by_id_for_user(
        &self,
        order_id: i64,
        user_id: i64,
    ) -> Result<Option<Order>, sqlx::Error> {
        let Some(order_row) = sqlx::query(
            "SELECT order_id, user_id, status, delivery_address, total_amount, driver_id, created_at
             FROM orders WHERE order_id = $1 AND user_id = $2",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = self.get_items(order_id).await?;
        Ok(Some(row_to_order(&order_row, items)))
    }

    pub async fn get_by_user(&self, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT order_id, user_id, status, delivery_address, total_amount, driver_id, created_at
             FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let order_id: i64 = row.get("order_id");
            let items = self.get_items(order_id).await?;
            orders.push(row_to_order(row, items));
        }
        Ok(orders)
    }

    pub async fn get_deliveries_by_user(&self, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT order_id, user_id, status, delivery_address, total_amount, driver_id, created_at
             FROM orders WHERE user_id = $1 AND status = 'in_progress'
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let order_id: i64 = row.get("order_id");
            let items = self.get_items(order_id).await?;
            orders.push(row_to_order(row, items));
        }
        Ok(orders)
    }

    async fn get_items(&self, order_id: i64) -> Result<Vec<LineItem>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT product_id, product_name, unit_price, quantity, total_price
             FROM order_items WHERE order_id = $1 ORDER BY product_id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LineItem {
                product_id: r.get("product_id"),
                product_name: r.get("product_name"),
                unit_price: r.get("unit_price"),
                quantity: r.get("quantity"),
                total_price: r.get("total_price"),
            })
            .collect())
    }

    /// Updates status and (optionally) driver_id, scoped to the owning
    /// `user_id`, returning the fresh row so the caller can write it
    /// straight into the cache without a re-read.
    pub async fn update_status(
        &self,
        order_id: i64,
        user_id: i64,
        driver_id: Option<i64>,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        let row = sqlx::query(
            "UPDATE orders SET status = $1, driver_id = $2 WHERE order_id = $3 AND user_id = $4
             RETURNING order_id, user_id, status, delivery_address, total_amount, driver_id, created_at",
        )
        .bind(status.as_str())
        .bind(driver_id)
        .bind(order_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let items = self.get_items(order_id).await?;
        Ok(row_to_order(&row, items))
    }

    pub async fn resolve_outbox(&self, order_id: i64, status: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE order_outbox SET status = $1 WHERE order_id = $2")
            .bind(status)
            .bind(order_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn fetch_pending_outbox(
        &self,
        limit: i64,
    ) -> Result<Vec<(i64, i64, serde_json::Value)>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, order_id, lines FROM order_outbox WHERE status = 'pending'
             ORDER BY id LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get("id"), r.get("order_id"), r.get("lines")))
            .collect())
    }

    pub async fn bump_outbox_attempts(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE order_outbox SET attempts = attempts + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn row_to_order(row: &sqlx::postgres::PgRow, items: Vec<LineItem>) -> Order {
    let status_str: String = row.get("status");
    Order {
        order_id: row.get("order_id"),
        user_id: row.get("user_id"),
        status: OrderStatus::parse(&status_str).unwrap_or(OrderStatus::Failed),
        delivery_address: row.get("delivery_address"),
        total_amount: row.get("total_amount"),
        driver_id: row.get("driver_id"),
        created_at: row
            .get::<chrono::DateTime<chrono::Utc>, _>("created_at")
            .timestamp(),
        items,
    }
}
