//! AppRole container entrypoint.
//!
//! Authenticates to Vault with an AppRole credential pair, reads one KV v2
//! secret, prints it, and then stays resident so the container keeps
//! running. Any HTTP failure during either call exits the process non-zero
//! before the residency phase is reached.

mod api;
mod config;

use std::io;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::VaultClient;
use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
    // Logs go to stderr so stdout carries only the echoed values.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "approle-init starting");

    // The original deployment echoed its credentials and the fetched value
    // for log scraping. Kept for parity, but this is plaintext secret
    // material on stdout.
    warn!("credentials and secret value are printed to stdout in plaintext");
    println!("addr: {}", config.addr);
    println!("role_id: {}", config.role_id);
    println!("secret_id: {}", config.secret_id);

    let client = VaultClient::new()?;
    match fetch_secret(&client, &config).await? {
        Some(value) => println!("key: {}", value),
        None => println!("key: <absent>"),
    }

    info!("secret fetched, entering residency loop");
    idle().await;
    Ok(())
}

/// Login then read, sequentially. A login failure returns before the KV
/// request is ever made.
async fn fetch_secret(client: &VaultClient, config: &Config) -> Result<Option<String>> {
    let token = client.login(config).await?;
    client.read_kv_key(config, &token).await
}

/// Park the task forever. Exists only to keep the container's entrypoint
/// process alive; it holds no resources and does no work.
async fn idle() {
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::timeout;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(addr: String) -> Config {
        Config {
            addr,
            role_id: "r".to_string(),
            secret_id: "s".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_failure_skips_the_kv_read() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/approle/login"))
            .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
            .mount(&server)
            .await;
        // The KV endpoint must never be hit when login fails
        Mock::given(method("GET"))
            .and(path("/v1/kv/data/test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = VaultClient::new().unwrap();
        let result = fetch_secret(&client, &test_config(server.uri())).await;
        assert!(result.is_err());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_end_to_end_flow_yields_the_stored_secret() {
        let server = MockServer::start().await;
        // Stub server authenticates any credential pair
        Mock::given(method("POST"))
            .and(path("/v1/auth/approle/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "auth": {"client_token": "hvs.any"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/kv/data/test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"data": {"key": "hello"}}
            })))
            .mount(&server)
            .await;

        let client = VaultClient::new().unwrap();
        let value = fetch_secret(&client, &test_config(server.uri()))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_idle_never_resolves() {
        assert!(timeout(Duration::from_millis(50), idle()).await.is_err());
    }
}
