//! Roster API server
//!
//! ```bash
//! cargo run -p roster-api
//! ```
//!
//! Configuration comes from the environment (and `.env`). The log format
//! follows `APP_ENV`: pretty debug output in development, JSON in
//! production.

use roster_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = try_init_tracing();
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.api.address(),
        seed = config.app.seed_sample_members,
        "Starting roster API server"
    );

    if let Err(e) = roster_api::run(config).await {
        error!(error = %e, code = e.error_code(), "Server failed");
        std::process::exit(1);
    }
}
