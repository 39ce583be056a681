use std::env;

use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub cookie_secret: String,
    pub cookie_secure: bool,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let cookie_secret = match lookup("COOKIE_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                log::warn!("COOKIE_SECRET not set, signing cookies with JWT_SECRET");
                jwt_secret.clone()
            }
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", 10u32)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let token_ttl_days = parse_or(&lookup, "TOKEN_TTL_DAYS", 7i64)?;
        if token_ttl_days <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_DAYS",
                value: token_ttl_days.to_string(),
            });
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080u16)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            cookie_secret,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            token_ttl_days,
            bcrypt_cost,
            cors_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
