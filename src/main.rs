mod api;
mod cli;
mod export;
mod scheduler;
mod settings;
mod store;
mod transport;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use corridorwatch_core::prelude::*;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::{AppState, create_router};
use cli::{Args, Command};
use store::SqliteStore;
use transport::HttpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = settings::load(&args.config)?;

    match args.command {
        Command::CheckConfig => check_config(&config),
        Command::PollOnce => poll_once(config, &args.database).await,
        Command::Serve { bind } => serve(config, &args.database, bind).await,
    }
}

fn check_config(config: &TrafficConfig) -> Result<()> {
    for corridor in &config.corridors {
        let bbox = corridor.bounding_box()?;
        info!(
            "{}: lat {}..{}, lon {}..{}, road classes up to {}",
            corridor.name,
            bbox.min_lat,
            bbox.max_lat,
            bbox.min_lon,
            bbox.max_lon,
            config.max_road_class(corridor)
        );
    }
    info!("Configuration is valid");
    Ok(())
}

fn build_poller(config: TrafficConfig, database: &Path) -> Result<Poller<HttpTransport, SqliteStore>> {
    let transport = HttpTransport::new(&config.base_url).context("failed to build HTTP client")?;
    let store = SqliteStore::open(database)
        .with_context(|| format!("failed to open database {}", database.display()))?;
    Ok(Poller::new(transport, store, config))
}

async fn poll_once(config: TrafficConfig, database: &Path) -> Result<()> {
    let poller = build_poller(config, database)?;
    let report = poller.poll_cycle().await;

    if report.persisted() == 0 {
        bail!("no corridor was polled successfully");
    }
    if report.failed() > 0 {
        warn!("{} corridors failed", report.failed());
    }
    Ok(())
}

async fn serve(config: TrafficConfig, database: &Path, bind: SocketAddr) -> Result<()> {
    let poller = Arc::new(build_poller(config, database)?);
    let state = AppState {
        store: poller.store().clone(),
        geometry: Arc::clone(poller.geometry_cache()),
    };

    let (stop, stopped) = watch::channel(false);
    let scheduler = tokio::spawn(scheduler::run(
        Arc::clone(&poller),
        scheduler::INITIAL_DELAY,
        wait_for(stopped),
    ));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("Serving on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {e}");
            }
            info!("Shutting down");
            let _ = stop.send(true);
        })
        .await
        .context("server error")?;

    scheduler.await.context("scheduler task failed")?;
    Ok(())
}

async fn wait_for(mut stopped: watch::Receiver<bool>) {
    let _ = stopped.wait_for(|stopped| *stopped).await;
}
