//! Runtime configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::IpAddr;

use crate::services::google::GoogleConfig;
use crate::store::AccessPolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub google: GoogleConfig,
    pub policy: AccessPolicy,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    /// - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REDIRECT_URI`
    ///
    /// Optional:
    /// - `BIND_ADDR`: default `127.0.0.1`
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `INSTITUTION_DOMAIN`: default `miamioh.edu`
    /// - `INSTITUTION_NAME`: default `Miami University`
    /// - `ACCESS_CONTACT`: default `Professor Ferris`
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is unset or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = AccessPolicy::default();
        let policy = AccessPolicy {
            domain: env_or("INSTITUTION_DOMAIN", defaults.domain)
                .trim_start_matches('@')
                .to_owned(),
            institution_name: env_or("INSTITUTION_NAME", defaults.institution_name),
            access_contact: env_or("ACCESS_CONTACT", defaults.access_contact),
        };

        let google = GoogleConfig {
            client_id: required("GOOGLE_CLIENT_ID")?,
            client_secret: required("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: required("GOOGLE_REDIRECT_URI")?,
            hosted_domain: Some(policy.domain.clone()),
        };

        Ok(Self {
            bind_addr: env_parse("BIND_ADDR", IpAddr::from([127, 0, 0, 1]))?,
            port: env_parse("PORT", DEFAULT_PORT)?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            google,
            policy,
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
