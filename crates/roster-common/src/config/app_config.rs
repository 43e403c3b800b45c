//! Application configuration
//!
//! Everything is read from the process environment; a `.env` file in the
//! working directory is loaded first when present. Only `API_PORT` and
//! `DATABASE_URL` are required. A variable that is set but unparsable is an
//! error rather than a silent fallback to the default.

use std::env;
use std::str::FromStr;

const DEFAULT_APP_NAME: &str = "roster";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_CONNECTIONS: u32 = 5;
const DEFAULT_AUDITOR: &str = "system";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub audit: AuditConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Insert the demo members at startup when the member table is empty
    pub seed_sample_members: bool,
}

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, suitable for binding a listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Actor recorded for writes whose request names nobody
    pub default_auditor: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// A variable that is unset or blank counts as absent
fn lookup(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name, raw.to_string()))
}

fn optional<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    lookup(name).map_or(Ok(default), |raw| parse_value(name, &raw))
}

fn required<T: FromStr>(name: &'static str) -> Result<T, ConfigError> {
    let raw = lookup(name).ok_or(ConfigError::MissingVar(name))?;
    parse_value(name, &raw)
}

/// Accepts `true/false`, `1/0`, `yes/no`
fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name, value.to_string())),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is normal outside development
        let _ = dotenvy::dotenv();

        let env = match lookup("APP_ENV") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };
        let seed_sample_members = match lookup("SEED_SAMPLE_MEMBERS") {
            Some(raw) => parse_flag("SEED_SAMPLE_MEMBERS", &raw)?,
            None => false,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                env,
                seed_sample_members,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: required("API_PORT")?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: optional("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
                min_connections: optional("DATABASE_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
            },
            audit: AuditConfig {
                default_auditor: lookup("DEFAULT_AUDITOR")
                    .unwrap_or_else(|| DEFAULT_AUDITOR.to_string()),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|raw| split_list(&raw))
                    .unwrap_or_default(),
            },
        })
    }
}
