//! Order Core: owns orders, line items, the document cache, and the
//! `driver.found` dispatch handshake.

mod bus;
mod cache;
mod repository;
mod service;

pub use bus::{DriverFoundBus, DriverFoundConsumer};
pub use cache::OrderCache;
pub use repository::OrderRepository;
pub use service::OrderService;
