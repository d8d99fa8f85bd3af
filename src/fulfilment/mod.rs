//! Fulfilment Orchestrator (FO): the gateway-facing use-case layer, plus
//! the background outbox worker that reconciles WC with OC's order writes.

mod orchestrator;
mod outbox;

pub use orchestrator::FulfilmentOrchestrator;
pub use outbox::OutboxWorker;
