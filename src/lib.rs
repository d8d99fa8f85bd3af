//! Fulfilment Core — order-fulfilment orchestration platform.
//!
//! Binds three cores behind one HTTP gateway:
//!
//! - [`warehouse`] — Warehouse Core (WC): the stock ledger.
//! - [`driver`] — Driver Core (DC): driver availability and dispatch.
//! - [`order`] — Order Core (OC): orders, line items, cache, and the
//!   `driver.found` bus handshake.
//! - [`fulfilment`] — Fulfilment Orchestrator (FO): the use-case layer the
//!   gateway calls into, plus the outbox reconciliation worker.
//! - [`auth`] — Auth Core (AC) client: bearer-JWT verification.
//! - [`gateway`] — the HTTP surface binding all of the above.
//!
//! [`contracts`] holds the shared types and the RPC trait seams that keep
//! the collaborator graph acyclic.

pub mod auth;
pub mod config;
pub mod contracts;
pub mod driver;
pub mod error;
pub mod fulfilment;
pub mod gateway;
pub mod logging;
pub mod order;
pub mod warehouse;

pub use config::AppConfig;
pub use error::FulfilmentError;
