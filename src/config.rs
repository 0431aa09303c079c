use std::env;
use std::net::SocketAddr;

use crate::i18n::Locale;

/// Minimum length of `SESSION_KEY` accepted by the cookie session store.
pub const SESSION_KEY_MIN_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_key: Option<String>,
    pub locale: Locale,
    pub db_max_connections: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Backoffice".to_string(),
            database_url: String::new(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            session_key: None,
            locale: Locale::default(),
            db_max_connections: 8,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = match get("BIND_ADDR") {
            Some(value) => value
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::Invalid { key: "BIND_ADDR", value })?,
            None => defaults.bind_addr,
        };

        let locale = match get("APP_LOCALE") {
            Some(value) => value
                .parse::<Locale>()
                .map_err(|_| ConfigError::Invalid { key: "APP_LOCALE", value })?,
            None => defaults.locale,
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", value }),
            },
            None => defaults.db_max_connections,
        };

        Ok(Self {
            app_name: get("APP_NAME").unwrap_or(defaults.app_name),
            database_url,
            bind_addr,
            session_key: get("SESSION_KEY"),
            locale,
            db_max_connections,
            admin_email: get("ADMIN_EMAIL"),
            admin_password: get("ADMIN_PASSWORD"),
        })
    }

    /// The session key, if one long enough was configured.
    pub fn usable_session_key(&self) -> Option<&[u8]> {
        self.session_key
            .as_deref()
            .filter(|k| k.len() >= SESSION_KEY_MIN_LEN)
            .map(str::as_bytes)
    }
}
