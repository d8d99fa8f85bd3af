//! Process entry point: wires WC, DC, OC, FO and the HTTP gateway together,
//! then spawns the outbox worker and the `driver.found` bus consumer as
//! background tasks alongside the HTTP server.

use std::sync::Arc;

use fulfilment_core::auth::JwtAuthenticator;
use fulfilment_core::config::AppConfig;
use fulfilment_core::contracts::{DriverCore, OrderCore, WarehouseCore};
use fulfilment_core::driver::{DriverRepository, DriverService, UniformRandomSelector};
use fulfilment_core::fulfilment::{FulfilmentOrchestrator, OutboxWorker};
use fulfilment_core::gateway::state::AppState;
use fulfilment_core::gateway::run_server;
use fulfilment_core::logging::init_logging;
use fulfilment_core::order::{DriverFoundBus, DriverFoundConsumer, OrderCache, OrderRepository, OrderService};
use fulfilment_core::warehouse::{WarehouseRepository, WarehouseService};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let _log_guard = init_logging(&config);

    tracing::info!(git_hash = env!("GIT_HASH"), "starting fulfilment gateway");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_pool_size)
        .connect(&config.database_url)
        .await?;

    let warehouse_repo = WarehouseRepository::new(pool.clone());
    let warehouse: Arc<dyn WarehouseCore> = Arc::new(WarehouseService::new(warehouse_repo));

    let driver_repo = DriverRepository::new(pool.clone());
    let driver: Arc<dyn DriverCore> = Arc::new(DriverService::new(
        driver_repo,
        Box::new(UniformRandomSelector),
        &config.kafka_brokers,
        config.kafka_topic.clone(),
    )?);

    let order_repo = Arc::new(OrderRepository::new(pool.clone()));
    let order_cache = OrderCache::connect(&config.redis_url, config.order_cache_ttl).await?;
    let bus = DriverFoundBus::new();

    let order: Arc<dyn OrderCore> = Arc::new(OrderService::new(
        OrderRepository::new(pool.clone()),
        order_cache,
        bus,
        warehouse.clone(),
        driver.clone(),
        config.deadlines.assign_driver,
    ));

    let consumer = DriverFoundConsumer::new(
        &config.kafka_brokers,
        &config.kafka_consumer_group,
        config.kafka_topic.clone(),
        order.clone(),
    )?;
    tokio::spawn(async move { consumer.run().await });

    let outbox = OutboxWorker::new(
        order_repo,
        warehouse.clone(),
        order.clone(),
        std::time::Duration::from_secs(2),
    );
    tokio::spawn(async move { outbox.run().await });

    let fulfilment = Arc::new(FulfilmentOrchestrator::new(
        order,
        warehouse,
        driver,
        config.fo_concurrency,
    ));

    let authenticator = Arc::new(JwtAuthenticator::new(&config.jwt_secret));

    let state = AppState {
        fulfilment,
        authenticator,
    };

    run_server(&config.http_addr, state).await?;
    Ok(())
}
