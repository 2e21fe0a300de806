use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use roomwatch_engine::asset::AssetResolver;
use roomwatch_engine::Engine;

use crate::api::{self, AppState};
use crate::asset::{CachedResolver, StaticResolver};
use crate::config::DaemonConfig;
use crate::scheduler::{self, ASSET_REFRESH_INTERVAL};
use crate::sensor::SensorHub;

pub async fn run(config: DaemonConfig) -> anyhow::Result<()> {
    let engine = Engine::new(&config.engine).context("engine configuration")?;
    let hub = SensorHub::new(&config.sensors);
    let state = AppState::new(engine.clone(), hub.clone());

    tracing::info!(
        api_addr = %config.api_addr,
        tick_s = config.engine.tick_interval_seconds,
        sensors = config.sensors.len(),
        rules = engine.rule_configs().iter().filter(|r| r.enabled).count(),
        "daemon configured"
    );

    let resolver: Arc<dyn AssetResolver> = Arc::new(CachedResolver::new(
        StaticResolver::new(config.assets.clone()),
        Duration::from_secs(config.asset_cache_ttl_seconds),
    ));

    let tasks = [
        scheduler::spawn_evaluation_loop(
            engine.clone(),
            hub,
            Duration::from_secs(config.engine.tick_interval_seconds),
            state.ready.clone(),
        ),
        scheduler::spawn_retention(engine.clone(), config.engine.store.retention_days),
        scheduler::spawn_asset_refresh(engine, resolver, ASSET_REFRESH_INTERVAL),
    ];

    let listener = TcpListener::bind(&config.api_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.api_addr))?;
    tracing::info!(addr = %config.api_addr, "HTTP API listening");

    api::serve(listener, state, crate::shutdown::wait_for_shutdown()).await?;

    tracing::info!("shutting down");
    for task in tasks {
        task.abort();
    }
    Ok(())
}
