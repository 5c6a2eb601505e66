mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use opamp_core::ports::{StaticServerIdentity, SystemClock};
use opamp_rest::AppState;
use opamp_server::{InMemoryConnectionRegistry, OpampHandler};
use opamp_store::InMemoryStore;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "opampd", about = "OpAMP fleet control plane server")]
struct Cli {
    /// Path to a YAML config file; `OPAMPD_*` environment variables are
    /// applied on top of it.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init(config.log_format);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Arc::new(SystemClock);
    let identity = Arc::new(StaticServerIdentity(config.server_identity.clone()));
    let store = Arc::new(InMemoryStore::new(clock.clone()));
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let remote_config_policy = config.remote_config_policy.into();
    let handler = Arc::new(OpampHandler::new(
        store.clone(),
        registry.clone(),
        clock.clone(),
        identity.clone(),
        remote_config_policy,
    ));

    let shutdown = CancellationToken::new();
    let sweep = opamp_store::sweep::spawn_sweep_loop(
        store.clone(),
        Duration::from_secs(config.sweep_interval_secs),
        chrono::Duration::seconds(config.retention_secs),
        shutdown.clone(),
    );

    let opamp_router = opamp_server::transport::router(handler);
    let mut rest_state = AppState::new(store, registry, clock, identity);
    rest_state.remote_config_policy = remote_config_policy;
    let rest_router = opamp_rest::router(rest_state);

    let opamp_listener = tokio::net::TcpListener::bind(&config.opamp_bind_addr).await?;
    let rest_listener = tokio::net::TcpListener::bind(&config.rest_bind_addr).await?;
    info!(addr = %config.opamp_bind_addr, "opamp transport listening");
    info!(addr = %config.rest_bind_addr, "rest api listening");

    let opamp_shutdown = shutdown.clone();
    let rest_shutdown = shutdown.clone();
    let opamp_server = axum::serve(opamp_listener, opamp_router)
        .with_graceful_shutdown(async move { opamp_shutdown.cancelled().await });
    let rest_server =
        axum::serve(rest_listener, rest_router).with_graceful_shutdown(async move { rest_shutdown.cancelled().await });

    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received, draining in-flight connections");
        shutdown.cancel();
    });

    let grace = Duration::from_secs(config.shutdown_grace_secs);
    let (opamp_result, rest_result, _) = tokio::join!(
        tokio::time::timeout(grace, opamp_server),
        tokio::time::timeout(grace, rest_server),
        sweep,
    );
    opamp_result.map_err(|_| "opamp transport did not shut down within the grace period")??;
    rest_result.map_err(|_| "rest api did not shut down within the grace period")??;

    info!("exiting gracefully");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
