//! Use-case layer bound to FO's three inbound request classes
//! (create order, assign driver, complete delivery) plus the read paths.
//!
//! Every method acquires a permit from a bounded semaphore before doing
//! any RPC fan-out, capping FO's concurrent in-flight sub-tasks
//! regardless of how many HTTP requests land at once.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::contracts::{DriverCore, OrderCore, WarehouseCore};
use crate::contracts::types::{
    AssignDriverResult, DriverStatus, Order, RequestedItem, Stock, StockCheckItem,
};
use crate::error::FulfilmentError;

pub struct FulfilmentOrchestrator {
    order: Arc<dyn OrderCore>,
    warehouse: Arc<dyn WarehouseCore>,
    driver: Arc<dyn DriverCore>,
    semaphore: Arc<Semaphore>,
}

impl FulfilmentOrchestrator {
    pub fn new(
        order: Arc<dyn OrderCore>,
        warehouse: Arc<dyn WarehouseCore>,
        driver: Arc<dyn DriverCore>,
        concurrency: usize,
    ) -> Self {
        Self {
            order,
            warehouse,
            driver,
            semaphore: Arc::new(Semaphore::new(concurrency)),
        }
    }

    async fn permit(&self) -> Result<tokio::sync::SemaphorePermit<'_>, FulfilmentError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| FulfilmentError::Internal("concurrency semaphore closed".into()))
    }

    /// UC-1: Create Order. Checks availability with WC before asking OC to
    /// persist, so an out-of-stock request is reported as `StockUnavailable`
    /// rather than folded into OC's generic lifecycle errors.
    #[tracing::instrument(skip(self, items), fields(user_id))]
    pub async fn create_order(
        &self,
        user_id: i64,
        delivery_address: &str,
        items: &[RequestedItem],
    ) -> Result<Order, FulfilmentError> {
        let _permit = self.permit().await?;

        let check_items: Vec<StockCheckItem> = items
            .iter()
            .map(|i| StockCheckItem {
                product_name: i.product_name.clone(),
                quantity: i.quantity,
            })
            .collect();
        let available = self
            .warehouse
            .check_stock_availability(&check_items)
            .await
            .map_err(FulfilmentError::from)?;
        if !available {
            return Err(FulfilmentError::StockUnavailable(
                "requested quantity exceeds available stock".into(),
            ));
        }

        self.order
            .create_order(user_id, delivery_address, items)
            .await
            .map_err(FulfilmentError::from)
    }

    /// UC-2: Assign Driver. On success, issues the explicit
    /// `UpdateDriverStatus(busy)` step — selection itself never changes a
    /// driver's status.
    #[tracing::instrument(skip(self), fields(order_id))]
    pub async fn assign_driver(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<AssignDriverResult, FulfilmentError> {
        let _permit = self.permit().await?;
        let result = self
            .order
            .assign_driver(user_id, order_id)
            .await
            .map_err(FulfilmentError::from)?;

        if result.success {
            if let Some(driver_id) = result.driver_id {
                if let Err(err) = self
                    .driver
                    .update_driver_status(driver_id, DriverStatus::Busy)
                    .await
                {
                    tracing::warn!(
                        error = %err.message,
                        driver_id,
                        "failed to mark driver busy after assignment"
                    );
                }
            }
        }

        Ok(result)
    }

    /// UC-3: Complete Delivery.
    #[tracing::instrument(skip(self), fields(order_id))]
    pub async fn complete_delivery(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Order, FulfilmentError> {
        let _permit = self.permit().await?;
        self.order
            .complete_delivery(user_id, order_id)
            .await
            .map_err(FulfilmentError::from)
    }

    pub async fn get_orders_by_user(&self, user_id: i64) -> Result<Vec<Order>, FulfilmentError> {
        let _permit = self.permit().await?;
        self.order
            .get_orders_by_user(user_id)
            .await
            .map_err(FulfilmentError::from)
    }

    pub async fn get_order_details(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Order, FulfilmentError> {
        let _permit = self.permit().await?;
        self.order
            .get_order_details(user_id, order_id)
            .await
            .map_err(FulfilmentError::from)
    }

    pub async fn get_deliveries(&self, user_id: i64) -> Result<Vec<Order>, FulfilmentError> {
        let _permit = self.permit().await?;
        self.order
            .get_deliveries(user_id)
            .await
            .map_err(FulfilmentError::from)
    }

    pub async fn check_order_status(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Order, FulfilmentError> {
        let _permit = self.permit().await?;
        self.order
            .check_order_status(user_id, order_id)
            .await
            .map_err(FulfilmentError::from)
    }

    pub async fn get_warehouse_stock(&self) -> Result<Vec<Stock>, FulfilmentError> {
        let _permit = self.permit().await?;
        self.warehouse
            .get_warehouse_stock()
            .await
            .map_err(FulfilmentError::from)
    }

    pub async fn get_available_drivers(
        &self,
    ) -> Result<Vec<crate::contracts::types::Driver>, FulfilmentError> {
        let _permit = self.permit().await?;
        self.driver
            .get_available_drivers()
            .await
            .map_err(FulfilmentError::from)
    }
}
