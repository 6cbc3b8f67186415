//! Kiosk Player - Main entry point
//!
//! Runs the playback engine for one paired screen and serves the renderer
//! API until interrupted or until the backend unpairs the screen.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use kiosk_common::time::SystemClock;
use kiosk_player::api::{self, AppContext};
use kiosk_player::config::{Config, ConfigOverrides};
use kiosk_player::host::BroadcastHost;
use kiosk_player::playback::{EngineConfig, ExitReason, PlaybackEngine};
use kiosk_player::source::HttpPlaylistSource;
use kiosk_player::SharedState;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for kiosk-player
#[derive(Parser, Debug)]
#[command(name = "kiosk-player")]
#[command(about = "Scheduled playlist player for a paired signage screen")]
#[command(version)]
struct Args {
    /// Path to TOML config file (otherwise KIOSK_CONFIG or the default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the content backend
    #[arg(long, env = "KIOSK_SERVER_URL")]
    server_url: Option<String>,

    /// Identifier of the paired screen
    #[arg(short, long, env = "KIOSK_SCREEN_ID")]
    screen_id: Option<String>,

    /// Port for the renderer API
    #[arg(short, long, env = "KIOSK_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(
        args.config.as_deref(),
        ConfigOverrides {
            server_url: args.server_url,
            screen_id: args.screen_id,
            port: args.port,
        },
    )
    .context("Failed to load configuration")?;

    init_tracing(&config)?;

    info!(
        "Starting Kiosk Player v{} ({}) for screen {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        config.screen_id
    );
    match &config.config_file {
        Some(path) => info!("Configuration file: {}", path.display()),
        None => info!("No configuration file, using built-in defaults"),
    }
    info!("Content backend: {}", config.server_url);

    let state = Arc::new(SharedState::new());
    let source = Arc::new(
        HttpPlaylistSource::new(config.server_url.clone(), config.request_timeout)
            .context("Failed to create backend client")?,
    );
    let host = Arc::new(BroadcastHost::new(Arc::clone(&state)));

    let (engine, handle) = PlaybackEngine::new(
        EngineConfig::from(&config),
        source,
        host,
        Arc::clone(&state),
        Arc::new(SystemClock),
    );

    let listener = api::bind(config.port)
        .await
        .context("Failed to start HTTP server")?;
    let ctx = AppContext {
        state: Arc::clone(&state),
        engine: handle.clone(),
        screen_id: config.screen_id.clone(),
        port: config.port,
    };
    let server_cancel = CancellationToken::new();
    let server_task = {
        let token = server_cancel.clone();
        tokio::spawn(api::run(listener, ctx, async move { token.cancelled().await }))
    };

    let engine_task = tokio::spawn(engine.run());
    info!("Playback engine started");

    tokio::select! {
        _ = shutdown_signal() => {}
        _ = state.wait_for_exit() => {}
    }

    // Stops the driver and cancels every timer
    handle.shutdown();
    let reason = engine_task.await.context("Playback engine task failed")?;

    server_cancel.cancel();
    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("HTTP server error: {}", e),
        Err(e) => error!("HTTP server task failed: {}", e),
    }

    match reason {
        ExitReason::Shutdown => info!("Kiosk Player shutdown complete"),
        ExitReason::Unpaired(status) => {
            info!("Screen reported '{}': returning control to pairing", status)
        }
    }
    Ok(())
}

/// Initialize tracing from `RUST_LOG`, falling back to the configured level
fn init_tracing(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "kiosk_player={level},kiosk_common={level},tower_http=info",
            level = config.log_level
        )
        .into()
    });

    let (file_layer, stderr_layer) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
