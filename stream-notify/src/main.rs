use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use stream_notify::logging;
use stream_notify::services::ServiceContainer;

/// Post a chat notification when a watched Twitch or YouTube channel goes live.
#[derive(Debug, Parser)]
#[command(name = "stream-notify", version, about)]
struct Args {
    /// Path to the JSON config file.
    #[arg(long, env = "STREAM_NOTIFY_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Directory for rolling log files.
    #[arg(long, env = "STREAM_NOTIFY_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Run a single poll of every enabled watcher and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _guard = logging::init_logging(&args.log_dir).context("failed to initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting stream-notify");

    let container = ServiceContainer::new(&args.config)
        .await
        .with_context(|| format!("failed to start from {}", args.config.display()))?;
    let retention =
        logging::start_retention_cleanup(args.log_dir.clone(), container.cancellation_token());

    let shutdown = container.cancellation_token();
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        shutdown.cancel();
    });

    if let Err(e) = container.run(args.once).await {
        error!(error = %e, "Service error");
    }

    container.shutdown();
    let _ = retention.await;
    info!("stream-notify stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
