//! Headless driver for the cellular ecosystem.

mod control;
mod driver;
mod framebuffer;
mod telemetry;

use anyhow::{Context, Result};
use eco_core::EcosystemConfig;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    // Load configuration
    let config = load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        "Starting eco-grid driver"
    );

    let driver = driver::Driver::new(&config)?;

    let (tx, rx) = mpsc::channel(16);
    control::spawn_stdin_reader(tx);

    let driver = driver::run(
        driver,
        rx,
        config.driver.stats_interval_secs,
        shutdown_signal(),
    )
    .await;

    let census = driver.simulation().census();
    info!(
        steps = driver.total_steps(),
        clock = driver.simulation().clock(),
        plants = census.plants,
        animals = census.animals,
        frames = driver.framebuffer().frames_presented(),
        paused = driver.is_paused(),
        its = driver.rates().steps_per_second,
        "Driver stopped"
    );

    Ok(())
}

/// Config path from `ECO_CONFIG` or the first argument; defaults otherwise
fn load_config() -> Result<EcosystemConfig> {
    let path = std::env::var("ECO_CONFIG")
        .ok()
        .or_else(|| std::env::args().nth(1));

    match path {
        Some(path) => {
            info!("Loading configuration from {}", path);
            EcosystemConfig::from_json_file(&path)
                .with_context(|| format!("failed to load configuration from {path}"))
        }
        None => Ok(EcosystemConfig::default()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
