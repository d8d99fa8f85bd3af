//! Status taxonomy and the async trait seams WC/DC/OC expose to FO.
//!
//! FO never calls another core's concrete type directly — it holds a
//! `Arc<dyn WarehouseCore>` / `Arc<dyn DriverCore>` / `Arc<dyn OrderCore>`,
//! which is what keeps the collaborator graph acyclic and lets tests swap
//! in fakes.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    AssignDriverResult, Driver, DriverFoundEvent, Order, PriceInfo, RequestedItem, Stock,
    StockCheckItem, StockUpdateItem,
};

/// RPC-level status, independent of transport (mapped to HTTP by the gateway).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotFound,
    InvalidArgument,
    FailedPrecondition,
    Internal,
    Unauthenticated,
    DeadlineExceeded,
}

/// An error returned from a WC/DC/OC operation.
#[derive(Debug, Error)]
#[error("{status:?}: {message}")]
pub struct RpcError {
    pub status: Status,
    pub message: String,
}

impl RpcError {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Status::InvalidArgument, message)
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(Status::FailedPrecondition, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Status::Internal, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(Status::Unauthenticated, message)
    }

    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Status::DeadlineExceeded, message)
    }
}

pub type RpcResult<T> = Result<T, RpcError>;

/// Warehouse Core: owns the stock ledger.
#[async_trait]
pub trait WarehouseCore: Send + Sync {
    async fn check_stock_availability(&self, items: &[StockCheckItem]) -> RpcResult<bool>;

    async fn get_warehouse_stock(&self) -> RpcResult<Vec<Stock>>;

    /// Decrements stock for an order, idempotent on `order_id`. Calling this
    /// twice for the same order_id must not double-decrement.
    async fn update_stock(&self, order_id: i64, items: &[StockUpdateItem]) -> RpcResult<()>;
}

/// Driver Core: owns driver availability and dispatch.
#[async_trait]
pub trait DriverCore: Send + Sync {
    async fn get_available_drivers(&self) -> RpcResult<Vec<Driver>>;

    /// Picks a driver for `order_id` and publishes the result to the bus;
    /// does not block on delivery of that event.
    async fn find_suitable_driver(&self, order_id: i64) -> RpcResult<()>;

    async fn update_driver_status(
        &self,
        driver_id: i64,
        status: crate::contracts::types::DriverStatus,
    ) -> RpcResult<()>;
}

/// Order Core: owns orders, line items, and the dispatch handshake.
#[async_trait]
pub trait OrderCore: Send + Sync {
    async fn create_order(
        &self,
        user_id: i64,
        delivery_address: &str,
        items: &[RequestedItem],
    ) -> RpcResult<Order>;

    async fn get_order_item_info(&self, product_names: &[String]) -> RpcResult<Vec<PriceInfo>>;

    async fn get_orders_by_user(&self, user_id: i64) -> RpcResult<Vec<Order>>;

    /// Scoped to `user_id`: an order that exists but belongs to another
    /// user is reported as `NotFound`, the same as a nonexistent order_id.
    async fn get_order_details(&self, user_id: i64, order_id: i64) -> RpcResult<Order>;

    async fn get_deliveries(&self, user_id: i64) -> RpcResult<Vec<Order>>;

    async fn check_order_status(&self, user_id: i64, order_id: i64) -> RpcResult<Order>;

    /// Registers a waiter for `order_id`'s `driver.found` event, asks DC to
    /// find a driver, then awaits the event up to the caller's deadline.
    /// Scoped to `user_id`, same as [`OrderCore::get_order_details`].
    async fn assign_driver(&self, user_id: i64, order_id: i64) -> RpcResult<AssignDriverResult>;

    async fn update_order_status(
        &self,
        order_id: i64,
        driver_id: Option<i64>,
        status: super::types::OrderStatus,
    ) -> RpcResult<()>;

    async fn complete_delivery(&self, user_id: i64, order_id: i64) -> RpcResult<Order>;

    /// Feeds a consumed `driver.found` event to the waiter registry; called
    /// by OC's bus-consumer loop, never by FO.
    async fn resolve_driver_found(&self, event: DriverFoundEvent) -> RpcResult<()>;
}
