//! Hydrant Registry Server - Main entry point

use anyhow::Result;
use hydrant_common::logging::{init_logging, LogConfig};
use tracing::info;

use hydrant_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before logging so LOG_* settings in it apply
    dotenvy::dotenv().ok();

    let log_config = LogConfig::builder()
        .log_file_prefix("hydrant-server")
        .filter_directives("hydrant_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Hydrant Registry server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    db::run_migrations(&pool).await?;

    api::serve(config, pool).await?;

    info!("Server shut down gracefully");

    Ok(())
}
