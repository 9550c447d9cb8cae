//! proxychat - chat channels for a Minecraft proxy
//!
//! Runs the plugin against an in-memory proxy driven by a script of player
//! events and commands read from stdin.

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::{error, info};

use proxychat::config::env::get_config_path;
use proxychat::console::ConsoleDriver;
use proxychat::host::LocalProxy;
use proxychat::{ConfigStore, ProxyChat};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("proxychat v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);
    let config = Arc::new(ConfigStore::open(&config_path));

    let snapshot = config.snapshot();
    info!("  Default channel: {}", snapshot.default_channel());
    info!(
        "  Force channel intercept: {}",
        snapshot.settings.force_channel_intercept
    );

    let proxy = Arc::new(LocalProxy::new());
    let plugin = Arc::new(ProxyChat::new(proxy.clone(), config));
    let driver = ConsoleDriver::new(proxy, plugin);

    tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        result = driver.run(tokio::io::stdin()) => {
            if let Err(e) = result {
                error!("Console input failed: {}", e);
                return Err(e);
            }
        }
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
