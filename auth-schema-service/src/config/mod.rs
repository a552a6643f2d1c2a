use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

use crate::models::{
    DEFAULT_TOKEN_EXPIRATION_HOURS, MAX_TOKEN_EXPIRATION_HOURS, MIN_TOKEN_EXPIRATION_HOURS,
};
use crate::services::ConnectionCheck;

#[derive(Debug, Clone)]
pub struct AuthSchemaConfig {
    /// Shared settings; `LOG_LEVEL` overrides `common.log_level`.
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    /// Absent when no backing database is configured.
    pub mongodb: Option<MongoConfig>,
    pub default_token_expiration_hours: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl AuthSchemaConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let mongodb = match get_optional_env("MONGODB_URI", is_prod)? {
            Some(uri) => Some(MongoConfig {
                uri,
                database: get_env("MONGODB_DATABASE", Some("auth_schemas"), is_prod)?,
            }),
            None => None,
        };

        common_config.log_level =
            get_env("LOG_LEVEL", Some(common_config.log_level.as_str()), is_prod)?;

        let config = AuthSchemaConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("auth-schema-service"), is_prod)?,
            mongodb,
            default_token_expiration_hours: get_env(
                "DEFAULT_TOKEN_EXPIRATION_HOURS",
                Some("24"),
                is_prod,
            )?
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                AppError::ConfigError(anyhow::anyhow!(e.to_string()))
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_TOKEN_EXPIRATION_HOURS..=MAX_TOKEN_EXPIRATION_HOURS)
            .contains(&self.default_token_expiration_hours)
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DEFAULT_TOKEN_EXPIRATION_HOURS must be between {} and {}",
                MIN_TOKEN_EXPIRATION_HOURS,
                MAX_TOKEN_EXPIRATION_HOURS
            )));
        }

        if let Some(mongodb) = &self.mongodb {
            if mongodb.database.trim().is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_DATABASE must not be empty"
                )));
            }
        }

        if self.environment == Environment::Prod && !self.has_connection() {
            tracing::error!("No MongoDB connection configured in production - auth systems cannot be committed");
        }

        Ok(())
    }
}

impl Default for AuthSchemaConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config {
                log_level: "info".to_string(),
            },
            environment: Environment::Dev,
            service_name: "auth-schema-service".to_string(),
            mongodb: None,
            default_token_expiration_hours: DEFAULT_TOKEN_EXPIRATION_HOURS,
        }
    }
}

impl ConnectionCheck for AuthSchemaConfig {
    fn has_connection(&self) -> bool {
        self.mongodb
            .as_ref()
            .is_some_and(|m| !m.uri.trim().is_empty())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

/// Blank values count as unset.
fn get_optional_env(key: &str, is_prod: bool) -> Result<Option<String>, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(Some(val)),
        _ if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(format!(
            "{} is required in production but not set",
            key
        )))),
        _ => Ok(None),
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
