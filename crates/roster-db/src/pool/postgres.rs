//! PostgreSQL connection pool

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use std::time::Duration;

/// Pool settings. Built from a URL and refined with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Schema set as `search_path` on every new connection
    pub search_path: Option<String>,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
            search_path: None,
        }
    }

    /// Read `DATABASE_URL` and the optional pool bounds
    pub fn from_env() -> Result<Self, sqlx::Error> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;
        let bound = |name: &str| std::env::var(name).ok().and_then(|v| v.parse::<u32>().ok());

        let defaults = Self::new(url);
        let max = bound("DATABASE_MAX_CONNECTIONS").unwrap_or(defaults.max_connections);
        let min = bound("DATABASE_MIN_CONNECTIONS").unwrap_or(defaults.min_connections);
        Ok(defaults.with_pool_size(max, min))
    }

    /// `min` is capped at `max`
    pub fn with_pool_size(mut self, max: u32, min: u32) -> Self {
        self.max_connections = max.max(1);
        self.min_connections = min.min(self.max_connections);
        self
    }

    /// Pin every connection to `schema`.
    ///
    /// Only ASCII letters, digits and underscores are accepted; anything else
    /// is ignored and the server default search path stays in effect.
    pub fn with_search_path(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        let valid = !schema.is_empty()
            && schema
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        self.search_path = valid.then_some(schema);
        self
    }
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime);

    if let Some(schema) = config.search_path.clone() {
        options = options.after_connect(move |conn, _meta| {
            let statement = format!("SET search_path TO {schema}");
            Box::pin(async move {
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        });
    }

    options.connect(&config.url).await
}
