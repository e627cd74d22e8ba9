use edudb_bootstrap::bootstrap::Bootstrapper;
use edudb_bootstrap::config::Config;
use edudb_bootstrap::engine::{MemoryEngine, MongoEngine, StorageEngine};

use tracing::{debug, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present
    let dotenv_result = dotenvy::dotenv();

    // Setup log directory
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&log_dir).unwrap_or_else(|e| {
        eprintln!("Warning: Could not create log directory {}: {}", log_dir, e);
    });

    // Create file appender with daily rotation
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "edudb-bootstrap.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,edudb_bootstrap=debug")),
        )
        // Console output
        .with(fmt::layer().with_target(true))
        // File output with JSON format for easy parsing
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking),
        )
        .init();

    debug!("Logging initialized - log directory: {}", log_dir);

    if let Err(e) = dotenv_result {
        warn!("No .env file found or error loading it: {}", e);
    }

    // Load configuration
    let config = Config::from_env()?;

    info!("Target catalog: {}", config.catalog);
    info!("Admin catalog: {}", config.admin_db);
    info!("Application user: {}", config.app.username);

    let engine: Box<dyn StorageEngine> = if config.dry_run {
        warn!("BOOTSTRAP_DRY_RUN set - running against the in-memory engine");
        Box::new(MemoryEngine::new())
    } else {
        info!("Connecting to MongoDB at {}", config.server_display());
        Box::new(MongoEngine::connect(&config.connection_uri(), &config.admin_db).await?)
    };

    engine.ping().await?;

    let report = Bootstrapper::new(engine.as_ref(), &config).run().await?;

    info!(
        "Bootstrap report: {}",
        serde_json::to_string(&report).unwrap_or_else(|e| format!("<unserializable: {}>", e))
    );

    Ok(())
}
