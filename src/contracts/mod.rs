//! Shared types and the RPC trait seams that WC/DC/OC expose to FO.
//!
//! Collecting the cross-component types and the `DriverFoundEvent` schema
//! here is what breaks the cyclic collaborator graph (FO -> OC -> DC -> WC):
//! every core depends on `contracts`, never on another core directly.

pub mod rpc;
pub mod types;

pub use rpc::{DriverCore, OrderCore, RpcError, RpcResult, Status, WarehouseCore};
pub use types::{
    AssignDriverResult, Driver, DriverFoundEvent, DriverStatus, DriverSummary, LineItem,
    NewLineItem, Order, OrderStatus, PriceInfo, RequestedItem, Stock, StockCheckItem,
    StockUpdateItem,
};
