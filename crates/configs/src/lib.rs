//! # configs
//!
//! Process settings, read once at startup from the environment (and `.env`
//! when present). Nothing here changes after the server starts.
//!
//! | variable | default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite:prompts.db?mode=rwc` |
//! | `SECRET_KEY` | `default-secret-key` |
//! | `ADMIN_IPS` | `127.0.0.1` |
//! | `ADDRESS_POLICY` | `peer` |
//! | `BIND_ADDR` | `127.0.0.1:8080` |
//! | `STATIC_DIR` | `static` |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment};
use domains::{AddressPolicy, AdminSet};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SECRET_KEY: &str = "default-secret-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    database_url: String,
    secret_key: String,
    admin_ips: String,
    address_policy: String,
    bind_addr: String,
    static_dir: String,
}

#[derive(Debug)]
pub struct Settings {
    /// Storage connection string
    pub database_url: String,
    /// Key for signing transient notices
    pub secret_key: SecretString,
    pub admins: AdminSet,
    pub address_policy: AddressPolicy,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

/// Loads `.env` into the process environment if the file exists.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: error loading .env file: {e}");
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(Environment::default())
    }

    /// Same as `from_env` but reads from the given variables only.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::build(Environment::default().source(Some(vars)))
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        let raw: RawSettings = Config::builder()
            .set_default("database_url", "sqlite:prompts.db?mode=rwc")?
            .set_default("secret_key", DEFAULT_SECRET_KEY)?
            .set_default("admin_ips", "127.0.0.1")?
            .set_default("address_policy", "peer")?
            .set_default("bind_addr", "127.0.0.1:8080")?
            .set_default("static_dir", "static")?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        let address_policy = raw
            .address_policy
            .parse::<AddressPolicy>()
            .map_err(|reason| ConfigError::Invalid { key: "ADDRESS_POLICY", reason })?;

        let bind_addr = raw
            .bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        if raw.secret_key.is_empty() {
            return Err(ConfigError::Invalid {
                key: "SECRET_KEY",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Settings {
            database_url: raw.database_url,
            secret_key: SecretString::from(raw.secret_key),
            admins: AdminSet::from_csv(&raw.admin_ips),
            address_policy,
            bind_addr,
            static_dir: PathBuf::from(raw.static_dir),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key.expose_secret() == DEFAULT_SECRET_KEY
    }
}
