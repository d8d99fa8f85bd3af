use async_trait::async_trait;

use crate::contracts::{RpcError, RpcResult, WarehouseCore};
use crate::contracts::types::{Stock, StockCheckItem, StockUpdateItem};

use super::repository::WarehouseRepository;

pub struct WarehouseService {
    repo: WarehouseRepository,
}

impl WarehouseService {
    pub fn new(repo: WarehouseRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl WarehouseCore for WarehouseService {
    #[tracing::instrument(skip(self, items))]
    async fn check_stock_availability(&self, items: &[StockCheckItem]) -> RpcResult<bool> {
        let names: Vec<String> = items.iter().map(|i| i.product_name.clone()).collect();
        let stock = self
            .repo
            .get_by_names(&names)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?;

        for requested in items {
            let available = stock
                .iter()
                .find(|s| s.product_name == requested.product_name)
                .map(|s| s.quantity)
                .unwrap_or(0);
            if available < requested.quantity {
                return Ok(false);
            }
        }
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn get_warehouse_stock(&self) -> RpcResult<Vec<Stock>> {
        self.repo
            .get_all()
            .await
            .map_err(|e| RpcError::internal(e.to_string()))
    }

    #[tracing::instrument(skip(self, items), fields(order_id))]
    async fn update_stock(&self, order_id: i64, items: &[StockUpdateItem]) -> RpcResult<()> {
        if self
            .repo
            .is_already_applied(order_id)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?
        {
            tracing::info!(order_id, "stock update already applied, skipping");
            return Ok(());
        }

        let pairs: Vec<(i64, i32)> = items.iter().map(|i| (i.product_id, i.quantity)).collect();
        let applied = self
            .repo
            .apply_decrement(order_id, &pairs)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?;

        if applied {
            Ok(())
        } else {
            Err(RpcError::failed_precondition(format!(
                "insufficient stock to apply order {order_id}"
            )))
        }
    }
}
