//! # concur-api - Binary Entry Point
//!
//! Starts the Axum HTTP server for the Concur consent registry.
//! Binds to the configured port (default 8080).

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use concur_api::config::{AppConfig, LogFormat};
use concur_api::state::AppState;

const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config);
    tracing::info!(?config, "starting concur-api");

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing Prometheus recorder")?;
    let upkeep = metrics.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    let store = concur_api::db::init_store(&config).await.map_err(|e| {
        tracing::error!("Store initialization failed: {e}");
        e
    })?;

    tokio::fs::create_dir_all(&config.manifest_dir)
        .await
        .with_context(|| format!("creating manifest directory {}", config.manifest_dir.display()))?;

    let port = config.port;
    let state = AppState::new(store, config).with_metrics(metrics);
    let app = concur_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Concur API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
