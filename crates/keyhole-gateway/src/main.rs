use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use keyhole_gateway::cli::{Cli, StorageBackendArg};
use keyhole_gateway::seed::seed_from_file;
use keyhole_gateway::telemetry::init_tracing;
use keyhole_gateway::{App, AppState};
use keyhole_resolver::{CachedRepository, MokaAccessCache, Resolver, ResolverService};
use keyhole_storage::{InMemoryRepository, MySqlRepository, Repository};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cache_ttl_secs = config.cache_ttl().map(|ttl| ttl.as_secs()),
        "starting keyhole gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => run(&config, InMemoryRepository::new()).await,
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn)
                .await
                .context("failed to connect to mysql")?;
            run(&config, repository).await
        }
    }
}

async fn run<R: Repository + 'static>(config: &Cli, repository: R) -> anyhow::Result<()> {
    if let Some(path) = &config.records_file {
        seed_from_file(&repository, path)
            .await
            .with_context(|| format!("failed to seed records from {}", path.display()))?;
    } else if matches!(config.storage, StorageBackendArg::InMemory) {
        warn!("in-memory storage without a records file; every password will be rejected");
    }

    let resolver: Arc<dyn Resolver> = match config.cache_ttl() {
        Some(ttl) => {
            let cache = MokaAccessCache::with_ttl(config.cache_capacity, ttl);
            Arc::new(ResolverService::new(CachedRepository::new(repository, cache)))
        }
        None => Arc::new(ResolverService::new(repository)),
    };

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    App::serve(listener, AppState::new(resolver), shutdown_signal()).await?;
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
