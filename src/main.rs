//! Memo Cache - diagnostics server for the named application caches
//!
//! Builds the "global", "session" and "permission" caches from the
//! environment, sweeps them in the background and serves their statistics.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::api::create_router;
use memo_cache::{spawn_sweep_task, AppState, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the named caches, failing fast on invalid settings
/// 4. Start one expiry sweep task per cache, unless disabled
/// 5. Serve the diagnostics router on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Memo Cache diagnostics server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: global={:?}, session={:?}, permission={:?}, sweep_interval={}ms, port={}",
        config.global,
        config.session,
        config.permission,
        config.sweep_interval_ms,
        config.server_port
    );

    let state = AppState::from_config(&config).context("invalid cache configuration")?;
    info!("Named caches initialized");

    let sweepers: Vec<JoinHandle<()>> = match config.sweep_interval() {
        Some(interval) => state
            .caches
            .iter()
            .map(|(name, cache)| spawn_sweep_task(name, cache.clone(), interval))
            .collect(),
        None => {
            info!("Expiry sweeping disabled");
            Vec::new()
        }
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweepers))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the sweepers.
async fn shutdown_signal(sweepers: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for sweeper in &sweepers {
        sweeper.abort();
    }
    warn!("Expiry sweep tasks aborted");
}
