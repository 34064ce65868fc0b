// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::auth::password::DEFAULT_ITERATIONS;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// PBKDF2 iteration count for newly written credentials. Tunable, not
    /// hard-coded; existing records carry their own count.
    pub pbkdf2_iterations: u32,
    /// Auth endpoint lockout knobs
    pub auth_rate_limit: AuthRateLimitSettings,
}

/// Lockout knobs for the credential endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRateLimitSettings {
    /// Failed attempts before a client is locked out
    pub max_failures: u32,
    /// Lockout duration in seconds
    pub lockout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            pbkdf2_iterations: DEFAULT_ITERATIONS,
            auth_rate_limit: AuthRateLimitSettings::default(),
        }
    }
}

impl Default for AuthRateLimitSettings {
    fn default() -> Self {
        Self {
            max_failures: 5,
            lockout_secs: 5 * 60,
        }
    }
}

impl Settings {
    /// Load settings from the default config file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from("saberpro.toml")
    }

    /// Load settings from a specific config file, layered over defaults
    /// and under `SABERPRO_` environment variables.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SABERPRO_").split("__"))
            .extract()?;
        Ok(settings)
    }
}
