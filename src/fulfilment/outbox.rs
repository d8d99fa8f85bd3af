//! Background worker reconciling `order_outbox` rows against WC.
//!
//! A `tokio::spawn`-driven polling loop: fetch a batch of pending rows,
//! try to apply each, retry transient failures and cancel the order on
//! a permanent one.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::contracts::{OrderCore, Status, WarehouseCore};
use crate::contracts::types::{OrderStatus, StockUpdateItem};
use crate::order::OrderRepository;

#[derive(Deserialize)]
struct OutboxLine {
    product_id: i64,
    quantity: i32,
}

pub struct OutboxWorker {
    repo: Arc<OrderRepository>,
    warehouse: Arc<dyn WarehouseCore>,
    order: Arc<dyn OrderCore>,
    poll_interval: Duration,
    batch_size: i64,
}

impl OutboxWorker {
    pub fn new(
        repo: Arc<OrderRepository>,
        warehouse: Arc<dyn WarehouseCore>,
        order: Arc<dyn OrderCore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repo,
            warehouse,
            order,
            poll_interval,
            batch_size: 50,
        }
    }

    /// Runs forever, draining pending outbox rows on a fixed interval.
    pub async fn run(&self) {
        loop {
            if let Err(err) = self.drain_once().await {
                tracing::error!(error = %err, "outbox drain pass failed");
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn drain_once(&self) -> Result<(), sqlx::Error> {
        let pending = self.repo.fetch_pending_outbox(self.batch_size).await?;
        for (id, order_id, lines_json) in pending {
            self.process_one(id, order_id, lines_json).await;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, lines_json), fields(order_id, outbox_id = id))]
    async fn process_one(&self, id: i64, order_id: i64, lines_json: serde_json::Value) {
        let lines: Vec<OutboxLine> = match serde_json::from_value(lines_json) {
            Ok(lines) => lines,
            Err(err) => {
                tracing::error!(error = %err, "malformed outbox lines, marking failed");
                let _ = self.repo.resolve_outbox(order_id, "failed").await;
                return;
            }
        };

        let items: Vec<StockUpdateItem> = lines
            .into_iter()
            .map(|l| StockUpdateItem {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect();

        match self.warehouse.update_stock(order_id, &items).await {
            Ok(()) => {
                if let Err(err) = self.repo.resolve_outbox(order_id, "done").await {
                    tracing::error!(error = %err, "failed to mark outbox row done");
                }
            }
            Err(err) if err.status == Status::FailedPrecondition => {
                tracing::warn!(message = %err.message, "permanent stock failure, cancelling order");
                if let Err(update_err) = self
                    .order
                    .update_order_status(order_id, None, OrderStatus::Cancelled)
                    .await
                {
                    tracing::error!(error = %update_err.message, "failed to cancel order after stock failure");
                    return;
                }
                let _ = self.repo.resolve_outbox(order_id, "failed").await;
            }
            Err(err) => {
                tracing::warn!(message = %err.message, "transient stock update failure, will retry");
                let _ = self.repo.bump_outbox_attempts(id).await;
            }
        }
    }
}
