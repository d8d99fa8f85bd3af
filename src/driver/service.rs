use std::time::Duration;

use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;

use crate::contracts::{DriverCore, RpcError, RpcResult};
use crate::contracts::types::{Driver, DriverFoundEvent, DriverStatus, DriverSummary};

use super::repository::DriverRepository;
use super::selector::DriverSelector;

pub struct DriverService {
    repo: DriverRepository,
    selector: Box<dyn DriverSelector>,
    producer: FutureProducer,
    topic: String,
}

impl DriverService {
    pub fn new(
        repo: DriverRepository,
        selector: Box<dyn DriverSelector>,
        brokers: &str,
        topic: String,
    ) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("acks", "1")
            .set("compression.type", "snappy")
            .set("linger.ms", "10")
            .set("batch.size", "16384")
            .set("partitioner", "consistent_random")
            .create()?;

        Ok(Self {
            repo,
            selector,
            producer,
            topic,
        })
    }

    async fn publish(&self, event: &DriverFoundEvent) -> RpcResult<()> {
        let payload =
            serde_json::to_vec(event).map_err(|e| RpcError::internal(e.to_string()))?;
        let key = event.order_id.to_string();

        self.producer
            .send(
                FutureRecord::to(&self.topic).key(&key).payload(&payload),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| RpcError::internal(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DriverCore for DriverService {
    #[tracing::instrument(skip(self))]
    async fn get_available_drivers(&self) -> RpcResult<Vec<Driver>> {
        self.repo
            .get_available()
            .await
            .map_err(|e| RpcError::internal(e.to_string()))
    }

    /// Picks a candidate driver and publishes the result; does not itself
    /// change the driver's status — `update_driver_status(busy)` is a
    /// separate, explicit step taken by the caller on success.
    #[tracing::instrument(skip(self), fields(order_id))]
    async fn find_suitable_driver(&self, order_id: i64) -> RpcResult<()> {
        let candidates = self
            .repo
            .get_available()
            .await
            .map_err(|e| RpcError::internal(e.to_string()))?;

        let chosen = self.selector.select(&candidates).cloned();

        let event = match chosen {
            Some(driver) => DriverFoundEvent {
                order_id,
                driver: Some(DriverSummary::from(&driver)),
                success: true,
                message: "driver assigned".into(),
                timestamp: chrono::Utc::now().timestamp(),
            },
            None => DriverFoundEvent {
                order_id,
                driver: None,
                success: false,
                message: "No available drivers found".into(),
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        self.publish(&event).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_driver_status(&self, driver_id: i64, status: DriverStatus) -> RpcResult<()> {
        self.repo
            .set_status(driver_id, status)
            .await
            .map_err(|e| RpcError::internal(e.to_string()))
    }
}
