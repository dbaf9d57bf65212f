use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Secret shipped for local development only. Refused in production.
pub const DEVELOPMENT_SECRET: &str = "development-secret-change-me";

/// Longest accepted access token lifetime: one year.
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("SECRET_KEY must be set")]
    MissingSecret,

    #[error("The development SECRET_KEY cannot be used in production")]
    InsecureSecret,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub assessment: AssessmentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
    pub password_memory_kib: u32,
    pub password_iterations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub reports_base_url: String,
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse("PORT", v)?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", v)?;
        }

        // Security overrides
        if let Some(v) = lookup("SECRET_KEY") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.access_token_expire_minutes = parse("ACCESS_TOKEN_EXPIRE_MINUTES", v)?;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("PASSWORD_HASH_MEMORY_KIB") {
            self.security.password_memory_kib = parse("PASSWORD_HASH_MEMORY_KIB", v)?;
        }
        if let Some(v) = lookup("PASSWORD_HASH_ITERATIONS") {
            self.security.password_iterations = parse("PASSWORD_HASH_ITERATIONS", v)?;
        }

        // Assessment overrides
        if let Some(v) = lookup("REPORTS_BASE_URL") {
            self.assessment.reports_base_url = v.trim_end_matches('/').to_string();
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.environment == Environment::Production
            && self.security.jwt_secret == DEVELOPMENT_SECRET
        {
            return Err(ConfigError::InsecureSecret);
        }
        let ttl = self.security.access_token_expire_minutes;
        if ttl <= 0 || ttl > MAX_ACCESS_TOKEN_EXPIRE_MINUTES {
            return Err(ConfigError::InvalidValue {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: ttl.to_string(),
            });
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                access_token_expire_minutes: 30,
                cors_origins: vec!["*".to_string()],
                password_memory_kib: 19 * 1024,
                password_iterations: 2,
            },
            assessment: AssessmentConfig {
                reports_base_url: "https://storage.example.com".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                access_token_expire_minutes: 30,
                cors_origins: vec!["https://staging.example.com".to_string()],
                password_memory_kib: 19 * 1024,
                password_iterations: 2,
            },
            assessment: AssessmentConfig {
                reports_base_url: "https://storage.example.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                // Must be provided through SECRET_KEY
                jwt_secret: String::new(),
                access_token_expire_minutes: 30,
                cors_origins: vec!["https://app.example.com".to_string()],
                password_memory_kib: 19 * 1024,
                password_iterations: 2,
            },
            assessment: AssessmentConfig {
                reports_base_url: "https://storage.example.com".to_string(),
            },
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}
