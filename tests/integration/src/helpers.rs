//! Test helpers for integration tests
//!
//! Provides isolated databases, an in-process HTTP client built on
//! `tower::ServiceExt::oneshot`, and response assertions.

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use roster_api::{create_app, AppState};
use roster_common::{
    AppConfig, AppSettings, AuditConfig, CorsConfig, DatabaseConfig as AppDatabaseConfig,
    Environment, ServerConfig,
};
use roster_db::{create_pool, migrate, DatabaseConfig, PgMemberRepository, PgPool};
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceExt;

/// Largest response body read by [`TestApp`]
const MAX_BODY: usize = 1024 * 1024;

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}

/// A migrated schema private to one test
pub struct TestDb {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
    url: String,
}

impl TestDb {
    /// Create a fresh schema and a pool whose connections use it
    pub async fn new() -> Result<Self> {
        let base = DatabaseConfig::from_env()?;
        let url = base.url.clone();
        let schema = format!("roster_test_{}", uuid::Uuid::new_v4().simple());

        let admin = create_pool(&base.with_pool_size(1, 0)).await?;
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await?;

        let pool = create_pool(&Self::config(&url, &schema)).await?;
        migrate(&pool).await?;

        Ok(Self {
            pool,
            admin,
            schema,
            url,
        })
    }

    fn config(url: &str, schema: &str) -> DatabaseConfig {
        DatabaseConfig::new(url)
            .with_pool_size(5, 0)
            .with_search_path(schema)
    }

    /// A second, independent pool on the same schema
    pub async fn another_pool(&self) -> Result<PgPool> {
        Ok(create_pool(&Self::config(&self.url, &self.schema)).await?)
    }

    /// Member repository with its queries prepared
    pub async fn member_repository(&self) -> Result<PgMemberRepository> {
        Ok(PgMemberRepository::init(self.pool.clone()).await?)
    }

    /// Drop the schema and everything in it
    pub async fn cleanup(self) {
        self.pool.close().await;
        let drop = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        if let Err(e) = sqlx::query(&drop).execute(&self.admin).await {
            eprintln!("Failed to drop test schema {}: {e}", self.schema);
        }
        self.admin.close().await;
    }
}

/// Configuration for an app under test; nothing is read from the environment
pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "roster-test".to_string(),
            env: Environment::Development,
            seed_sample_members: false,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: AppDatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
            min_connections: 0,
        },
        audit: AuditConfig {
            default_auditor: "test-system".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

/// A response read to completion
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// The application router driven in-process
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Build the app over the test database
    pub async fn start(db: &TestDb) -> Result<Self> {
        let config = test_config(&db.url);
        let state = AppState::new(db.pool.clone(), config).await?;
        Ok(Self {
            router: create_app(state),
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), MAX_BODY).await?.to_vec();

        Ok(TestResponse {
            status,
            content_type,
            body,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        self.send(request).await
    }

    /// Make a POST request with JSON body, optionally naming the actor
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        actor: Option<&str>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(actor) = actor {
            builder = builder.header(roster_api::extractors::ACTOR_HEADER, actor);
        }
        let request = builder.body(Body::from(serde_json::to_vec(body)?))?;
        self.send(request).await
    }
}

/// Assert response status and parse JSON body
pub fn assert_json<T: DeserializeOwned>(
    response: &TestResponse,
    expected_status: StatusCode,
) -> Result<T> {
    assert_status(response, expected_status)?;
    response.json()
}

/// Assert response status without parsing body
pub fn assert_status(response: &TestResponse, expected_status: StatusCode) -> Result<()> {
    if response.status != expected_status {
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            response.status,
            response.text()
        );
    }
    Ok(())
}
