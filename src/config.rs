//! Application configuration management.
//!
//! Configuration is read once at startup from the process environment
//! (optionally seeded from a `.env` file) and passed by reference into the
//! Vault client. There is no ambient global state.
//!
//! The namespace label and secret path are deployment constants, not
//! configurable values.

use anyhow::{Context, Result};

/// Tenant-scoping namespace header value required by the managed Vault
/// deployment.
pub const VAULT_NAMESPACE: &str = "admin";

/// Fixed KV v2 read path for the provisioned secret.
pub const SECRET_PATH: &str = "kv/data/test";

#[derive(Debug, Clone)]
pub struct Config {
    /// Vault base address, e.g. `https://vault.example.com:8200`
    pub addr: String,
    /// AppRole role identifier
    pub role_id: String,
    /// AppRole secret identifier
    pub secret_id: String,
}

impl Config {
    /// Load configuration from the process environment.
    /// Any missing variable is a startup error, raised before the first
    /// network call.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            addr: require_env("VAULT_ADDR")?,
            role_id: require_env("VAULT_ROLE_ID")?,
            secret_id: require_env("VAULT_SECRET_ID")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("Missing required environment variable {}", name))
}
