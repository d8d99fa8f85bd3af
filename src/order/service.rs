use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::contracts::{DriverCore, OrderCore, RpcError, RpcResult, WarehouseCore};
use crate::contracts::types::{
    AssignDriverResult, DriverFoundEvent, Order, OrderStatus, PriceInfo, RequestedItem, Stock,
};

use super::bus::DriverFoundBus;
use super::cache::OrderCache;
use super::repository::OrderRepository;

pub struct OrderService {
    repo: OrderRepository,
    cache: OrderCache,
    bus: DriverFoundBus,
    warehouse: Arc<dyn WarehouseCore>,
    driver: Arc<dyn DriverCore>,
    assign_driver_deadline: Duration,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        cache: OrderCache,
        bus: DriverFoundBus,
        warehouse: Arc<dyn WarehouseCore>,
        driver: Arc<dyn DriverCore>,
        assign_driver_deadline: Duration,
    ) -> Self {
        Self {
            repo,
            cache,
            bus,
            warehouse,
            driver,
            assign_driver_deadline,
        }
    }

    async fn stock_as_price_lookup(&self, names: &[String]) -> RpcResult<Vec<Stock>> {
        let all = self
            .warehouse
            .get_warehouse_stock()
            .await
            .map_err(|e| RpcError::internal(e.message))?;
        Ok(all
            .into_iter()
            .filter(|s| names.contains(&s.product_name))
            .collect())
    }
}

#[async_trait]
impl OrderCore for OrderService {
    #[tracing::instrument(skip(self, items), fields(user_id))]
    async fn create_order(
        &self,
        user_id: i64,
        delivery_address: &str,
        items: &[RequestedItem],
    ) -> RpcResult<Order> {
        if items.is_empty() {
            return Err(RpcError::invalid_argument("order must contain at least one item"));
        }

        let names: Vec<String> = items.iter().map(|i| i.product_name.clone()).collect();
        let priced = self.stock_as_price_lookup(&names).await?;

        let mut new_items = Vec::with_capacity(items.len());
        for requested in items {
            let stock = priced
                .iter()
                .find(|s| s.product_name == requested.product_name)
                .ok_or_else(|| {
                    RpcError::invalid_argument(format!("unknown product {}", requested.product_name))
                })?;
            if stock.quantity < requested.quantity {
                return Err(RpcError::failed_precondition(format!(
                    "insufficient stock for {}",
                    requested.product_name
                )));
            }
            new_items.push(crate::contracts::types::NewLineItem {
                product_id: stock.product_id,
                product_name: stock.product_name.clone(),
                unit_price: stock.unit_price,
                quantity: requested.quantity,
            });
        }

        let order = self
            .repo
            .create_with_outbox(user_id, delivery_address, &new_items)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?;

        if let Err(err) = self.cache.put(&order).await {
            tracing::warn!(error = %err, order_id = order.order_id, "failed to warm order cache");
        }

        Ok(order)
    }

    #[tracing::instrument(skip(self, product_names))]
    async fn get_order_item_info(&self, product_names: &[String]) -> RpcResult<Vec<PriceInfo>> {
        let stock = self.stock_as_price_lookup(product_names).await?;
        Ok(stock
            .into_iter()
            .map(|s| PriceInfo {
                product_id: s.product_id,
                unit_price: s.unit_price,
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_orders_by_user(&self, user_id: i64) -> RpcResult<Vec<Order>> {
        self.repo
            .get_by_user(user_id)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))
    }

    #[tracing::instrument(skip(self))]
    async fn get_order_details(&self, user_id: i64, order_id: i64) -> RpcResult<Order> {
        self.repo
            .get_by_id_for_user(order_id, user_id)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?
            .ok_or_else(|| RpcError::not_found(format!("order {order_id} not found")))
    }

    #[tracing::instrument(skip(self))]
    async fn get_deliveries(&self, user_id: i64) -> RpcResult<Vec<Order>> {
        self.repo
            .get_deliveries_by_user(user_id)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))
    }

    #[tracing::instrument(skip(self))]
    async fn check_order_status(&self, user_id: i64, order_id: i64) -> RpcResult<Order> {
        // The cache key is scoped by user_id, so a bare order_id lookup
        // needs the owning user first. `get_order_details` already hits
        // the store directly; cache population happens on writes.
        self.get_order_details(user_id, order_id).await
    }

    #[tracing::instrument(skip(self), fields(order_id))]
    async fn assign_driver(&self, user_id: i64, order_id: i64) -> RpcResult<AssignDriverResult> {
        let order = self.get_order_details(user_id, order_id).await?;
        if order.status != OrderStatus::Pending {
            return Err(RpcError::failed_precondition(format!(
                "order {order_id} is not pending (status={:?})",
                order.status
            )));
        }

        let rx = self.bus.register(order_id);

        if let Err(err) = self.driver.find_suitable_driver(order_id).await {
            self.bus.deregister(order_id);
            return Err(err);
        }

        let event = match tokio::time::timeout(self.assign_driver_deadline, rx).await {
            Ok(Ok(event)) => event,
            Ok(Err(_)) => {
                self.bus.deregister(order_id);
                return Err(RpcError::internal("driver.found waiter channel dropped"));
            }
            Err(_) => {
                self.bus.deregister(order_id);
                return Err(RpcError::deadline_exceeded("timed out waiting for driver assignment"));
            }
        };

        Ok(AssignDriverResult {
            driver_id: event.driver.as_ref().map(|d| d.id),
            order_id,
            success: event.success,
            message: event.message,
        })
    }

    /// Not scoped to a caller-supplied user_id in its signature — invoked
    /// only by the `driver.found` consumer and the outbox worker, which
    /// learn the owning user_id from the order itself before writing.
    #[tracing::instrument(skip(self))]
    async fn update_order_status(
        &self,
        order_id: i64,
        driver_id: Option<i64>,
        status: OrderStatus,
    ) -> RpcResult<()> {
        let owner = self
            .repo
            .get_by_id(order_id)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?
            .ok_or_else(|| RpcError::not_found(format!("order {order_id} not found")))?;

        let order = self
            .repo
            .update_status(order_id, owner.user_id, driver_id, status)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?;

        if let Err(err) = self.cache.put(&order).await {
            tracing::warn!(error = %err, order_id, "failed to refresh order cache after status update");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn complete_delivery(&self, user_id: i64, order_id: i64) -> RpcResult<Order> {
        let order = self.get_order_details(user_id, order_id).await?;
        if order.status != OrderStatus::InProgress {
            return Err(RpcError::failed_precondition(format!(
                "order {order_id} is not in_progress (status={:?})",
                order.status
            )));
        }

        let updated = self
            .repo
            .update_status(order_id, user_id, order.driver_id, OrderStatus::Delivered)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?;

        if let Some(driver_id) = updated.driver_id {
            if let Err(err) = self
                .driver
                .update_driver_status(driver_id, crate::contracts::types::DriverStatus::Available)
                .await
            {
                tracing::warn!(error = %err.message, driver_id, "failed to free driver after delivery");
            }
        }

        if let Err(err) = self.cache.put(&updated).await {
            tracing::warn!(error = %err, order_id, "failed to refresh order cache after delivery");
        }

        Ok(updated)
    }

    #[tracing::instrument(skip(self, event), fields(order_id = event.order_id))]
    async fn resolve_driver_found(&self, event: DriverFoundEvent) -> RpcResult<()> {
        let status = if event.success {
            OrderStatus::InProgress
        } else {
            OrderStatus::Pending
        };
        let driver_id = event.driver.as_ref().map(|d| d.id);

        if event.success {
            self.update_order_status(event.order_id, driver_id, status)
                .await?;
        }

        self.bus.dispatch(event);
        Ok(())
    }
}
