//! The OC-side half of the `driver.found` handshake: a single long-lived
//! Kafka consumer task that demultiplexes events to per-order waiters.
//!
//! A `DashMap` keyed by order_id, each entry guarding a one-shot channel
//! sender, registered on wait and removed on completion.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::{ClientConfig, Message};
use tokio::sync::oneshot;

use crate::contracts::OrderCore;
use crate::contracts::types::DriverFoundEvent;

/// Registry of order_ids awaiting a `driver.found` event.
#[derive(Clone)]
pub struct DriverFoundBus {
    waiters: Arc<DashMap<i64, oneshot::Sender<DriverFoundEvent>>>,
}

impl DriverFoundBus {
    pub fn new() -> Self {
        Self {
            waiters: Arc::new(DashMap::new()),
        }
    }

    /// Registers a waiter for `order_id`. Replaces any prior waiter for the
    /// same order_id (a retried `assign_driver` call supersedes the old one).
    pub fn register(&self, order_id: i64) -> oneshot::Receiver<DriverFoundEvent> {
        let (tx, rx) = oneshot::channel();
        self.waiters.insert(order_id, tx);
        rx
    }

    pub fn deregister(&self, order_id: i64) {
        self.waiters.remove(&order_id);
    }

    /// Hands `event` to the matching waiter if one is registered, otherwise
    /// drops it. Called from [`crate::contracts::OrderCore::resolve_driver_found`],
    /// never directly from the consumer loop.
    pub fn dispatch(&self, event: DriverFoundEvent) {
        if let Some((_, tx)) = self.waiters.remove(&event.order_id) {
            let _ = tx.send(event);
        } else {
            tracing::warn!(
                order_id = event.order_id,
                "driver.found event with no registered waiter; dropping"
            );
        }
    }
}

impl Default for DriverFoundBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the Kafka consumer loop; for each decoded event it calls
/// `OrderCore::resolve_driver_found` (which applies the order's status
/// update and notifies the waiting `assign_driver` call) and only commits
/// the offset once that call returns successfully.
pub struct DriverFoundConsumer {
    consumer: StreamConsumer,
    order_core: Arc<dyn OrderCore>,
    topic: String,
}

impl DriverFoundConsumer {
    pub fn new(
        brokers: &str,
        group_id: &str,
        topic: String,
        order_core: Arc<dyn OrderCore>,
    ) -> Result<Self, rdkafka::error::KafkaError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "latest")
            .set("fetch.min.bytes", "1")
            .set("fetch.max.bytes", "100000")
            .create()?;
        consumer.subscribe(&[&topic])?;
        Ok(Self {
            consumer,
            order_core,
            topic,
        })
    }

    pub async fn run(&self) {
        loop {
            match self.consumer.recv().await {
                Ok(msg) => {
                    let Some(payload) = msg.payload() else {
                        continue;
                    };
                    match serde_json::from_slice::<DriverFoundEvent>(payload) {
                        Ok(event) => {
                            if let Err(err) = self.order_core.resolve_driver_found(event).await {
                                tracing::error!(error = %err, "failed to resolve driver.found event, offset not committed");
                                continue;
                            }
                        }
                        Err(err) => {
                            tracing::error!(topic = %self.topic, error = %err, "malformed driver.found payload, skipping");
                        }
                    }
                    if let Err(err) =
                        self.consumer.commit_message(&msg, rdkafka::consumer::CommitMode::Async)
                    {
                        tracing::error!(error = %err, "failed to commit kafka offset");
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "kafka consumer error");
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
            }
        }
    }
}
