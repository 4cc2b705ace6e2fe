use crate::error::StockroomError;
use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::warn;

/// Prefix for environment overrides, e.g. `STOCKROOM_DATABASE_URL`.
pub const ENV_PREFIX: &str = "STOCKROOM_";

/// Extensions accepted for inventory images.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Process-wide configuration, built on first access.
pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("FATAL: invalid stockroom configuration"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Secret for the private session cookie; at least 64 bytes.
    pub cookie_secret: Option<String>,
    /// Drop the `Secure` cookie flag (plain HTTP during development).
    pub insecure_cookie: bool,
    /// Bulk user file loaded at startup.
    pub users_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:stockroom.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
            users_path: None,
        }
    }
}

impl Config {
    /// Defaults merged with `STOCKROOM_*` environment variables.
    pub fn load() -> Result<Self, StockroomError> {
        Self::figment().extract().map_err(StockroomError::from)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Key used to encrypt session cookies.
    ///
    /// A missing or too short secret yields a random key, which invalidates
    /// every session on restart.
    pub fn cookie_key(&self) -> Key {
        let Some(secret) = self.cookie_secret.as_deref() else {
            return Key::generate();
        };
        match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "cookie_secret unusable; generating a random key");
                Key::generate()
            }
        }
    }
}
