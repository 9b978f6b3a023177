//! Role sync server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p rolesync-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use rolesync_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first so the log format can follow the environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(trace_err) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {}", trace_err);
            }
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        env = ?config.app.env,
        address = %config.webhook.address(),
        webhook_path = %config.webhook.path,
        dry_run = config.sync.dry_run,
        "Configuration loaded"
    );

    rolesync_api::run(config).await?;

    Ok(())
}
