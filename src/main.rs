use std::sync::Arc;

use cardwatch::{background::NotifyScheduler, config, errors::Result, notify::NtfyChannel};
use dotenvy::dotenv;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_default_config()?;
    info!("Configuration loaded");

    // 4. Initialize the database
    let db = config::database::connect(&app_config.database_url).await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized");

    // 5. Build the notification transport
    let channel = Arc::new(NtfyChannel::new(&app_config.notify)?);

    // 6. Start the daily scan scheduler
    let mut scheduler = NotifyScheduler::new(db, channel, &app_config).await?;

    // 7. Run until asked to stop
    shutdown_signal().await;
    scheduler.shutdown().await;

    Ok(())
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
