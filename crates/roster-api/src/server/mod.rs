//! Server setup and initialization

use axum::Router;
use roster_common::{AppConfig, AppError};
use roster_core::auditing::AuditContext;
use roster_db::{create_pool, migrate, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::seed::seed_sample_members;
use crate::state::AppState;

/// Build the Axum application; health probes skip the request middleware
pub fn create_app(state: AppState) -> Router {
    let is_production = state.config().app.env.is_production();
    let api = apply_middleware(create_router(), &state.config().cors, is_production);

    api.merge(health_routes()).with_state(state)
}

/// Connect, migrate and wire the repositories
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = DatabaseConfig::new(config.database.url.clone()).with_pool_size(
        config.database.max_connections,
        config.database.min_connections,
    );
    let pool = create_pool(&db_config).await.map_err(AppError::database)?;
    info!("PostgreSQL connection established");

    migrate(&pool).await.map_err(AppError::database)?;

    let state = AppState::new(pool, config).await?;

    if state.config().app.seed_sample_members {
        let audit = AuditContext::from_auditor(state.auditor())?;
        seed_sample_members(state.members(), &audit).await?;
    }

    Ok(state)
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(AppError::Serve)?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, &addr).await
}
