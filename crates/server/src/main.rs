#![forbid(unsafe_code)]

//! Clientes daemon: owns the embedded DB and serves the API and forms.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::Parser;
use clientes_server::{
    config::ServerConfig,
    db::SurrealStore,
    http::{self, AppState},
    service::ClienteService,
};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "clientes-server", version, about = "Cliente records over HTTP")]
struct Args {
    /// Listen address, e.g. 0.0.0.0:5000
    #[arg(long, env = "CLIENTES_LISTEN", default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// SurrealDB endpoint: `surrealkv://<dir>` on disk, or `mem://`.
    #[arg(long, env = "CLIENTES_DB", default_value = "surrealkv://.clientes/db")]
    db: String,

    /// Log level (env-filter syntax).
    #[arg(long, env = "CLIENTES_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = ServerConfig {
        listen: args.listen,
        db_endpoint: args.db,
    };
    info!(?config, "starting clientes server");

    if let Some(dir) = config.db_dir() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating db dir {dir}"))?;
    }

    let store = SurrealStore::connect(&config.db_endpoint).await?;
    store.apply_schema().await?;

    let svc = ClienteService::new(Arc::new(store));
    let app = http::router(AppState::new(svc));

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    info!(listen = %config.listen, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
