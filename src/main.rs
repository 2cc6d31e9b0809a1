//! Taskboard HTTP server.
//!
//! Reads [`AppConfig`] from the environment, picks a `PostgreSQL` or
//! in-memory task store, and serves the task API until interrupted.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use taskboard::{
    api,
    config::AppConfig,
    task::{
        adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
        ports::TaskRepository,
        services::TaskLifecycleService,
    },
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "taskboard=info,tower_http=info";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().wrap_err("read configuration")?;
    info!(?config, "starting taskboard");

    if let Some(url) = config.database_url.as_deref() {
        let repository = PostgresTaskRepository::connect(url, config.db_pool_size)
            .await
            .wrap_err("connect to PostgreSQL")?;
        serve(&config, repository).await
    } else {
        warn!("DATABASE_URL is not set; tasks will be kept in memory only");
        serve(&config, InMemoryTaskRepository::new()).await
    }
}

async fn serve<R>(config: &AppConfig, repository: R) -> eyre::Result<()>
where
    R: TaskRepository + 'static,
{
    let service = TaskLifecycleService::new(Arc::new(repository), Arc::new(DefaultClock));
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .wrap_err_with(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, api::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("serve HTTP")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
