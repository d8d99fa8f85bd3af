//! Driver Core: owns driver availability and the dispatch bus producer.

mod repository;
mod selector;
mod service;

pub use repository::DriverRepository;
pub use selector::{DriverSelector, UniformRandomSelector};
pub use service::DriverService;
