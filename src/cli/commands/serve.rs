use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{AppConfig, StoreBackend};
use crate::database::DatabaseManager;
use crate::state::AppState;
use crate::store::{PgStore, Store};

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Use the in-memory store instead of Postgres")]
    pub memory: bool,
}

pub async fn handle(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if args.memory {
        config.store.backend = StoreBackend::Memory;
    }

    info!(
        "Starting Noteful API in {:?} mode with {:?} store",
        config.environment, config.store.backend
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));
    let state = match config.store.backend {
        StoreBackend::Memory => AppState::in_memory(config),
        StoreBackend::Postgres => {
            let store = connect_postgres(&config).await?;
            AppState::new(config, store)
        }
    };

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    crate::app::serve(listener, state).await?;
    Ok(())
}

async fn connect_postgres(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to Postgres")?;
    if config.database.bootstrap_schema {
        DatabaseManager::bootstrap_schema(&pool)
            .await
            .context("failed to bootstrap schema")?;
    }
    Ok(Arc::new(PgStore::new(pool)))
}
