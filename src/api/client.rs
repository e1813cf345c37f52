//! HTTP client for the Vault AppRole login and KV v2 read endpoints.
//!
//! Both calls are made sequentially on one task with no retry policy: any
//! non-success HTTP status is surfaced as a typed error for the caller to
//! abort on.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, SECRET_PATH, VAULT_NAMESPACE};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// A bound turns an unresponsive listener into a clean startup failure
/// instead of a wedged container.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Tenant namespace header expected by the managed Vault deployment
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// Header carrying the client token on authenticated requests
const TOKEN_HEADER: &str = "X-Vault-Token";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    role_id: &'a str,
    secret_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Debug, Deserialize)]
struct LoginAuth {
    client_token: String,
}

/// KV v2 wraps secret data in a double envelope: `data.data.<field>`.
#[derive(Debug, Deserialize)]
struct KvResponse {
    data: KvEnvelope,
}

#[derive(Debug, Deserialize)]
struct KvEnvelope {
    data: KvFields,
}

#[derive(Debug, Deserialize)]
struct KvFields {
    #[serde(default)]
    key: Option<String>,
}

/// Client for the Vault HTTP API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct VaultClient {
    client: Client,
}

impl VaultClient {
    /// Create a new Vault client with a bounded request timeout
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }

    /// Exchange the AppRole credential pair for a client token.
    /// Fails on any non-success status, a malformed body, or an empty token.
    pub async fn login(&self, config: &Config) -> Result<String> {
        let url = format!("{}/v1/auth/approle/login", config.addr);
        let body = LoginRequest {
            role_id: &config.role_id,
            secret_id: &config.secret_id,
        };

        let response = self
            .client
            .post(&url)
            .header(NAMESPACE_HEADER, VAULT_NAMESPACE)
            .json(&body)
            .send()
            .await
            .context("Failed to send AppRole login request")?;

        let response = Self::check_response(response).await?;

        let login: LoginResponse = response
            .json()
            .await
            .context("Failed to parse AppRole login response")?;

        if login.auth.client_token.is_empty() {
            return Err(
                ApiError::InvalidResponse("login returned an empty client token".into()).into(),
            );
        }

        debug!("AppRole login succeeded");
        Ok(login.auth.client_token)
    }

    /// Read the provisioned secret and extract its `key` field.
    /// HTTP failures are errors; a readable secret that lacks the `key`
    /// field is `Ok(None)` and left to the caller to report as absent.
    pub async fn read_kv_key(&self, config: &Config, token: &str) -> Result<Option<String>> {
        let url = format!("{}/v1/{}", config.addr, SECRET_PATH);

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .header(NAMESPACE_HEADER, VAULT_NAMESPACE)
            .send()
            .await
            .context("Failed to send KV read request")?;

        let response = Self::check_response(response).await?;

        let kv: KvResponse = response
            .json()
            .await
            .context("Failed to parse KV read response")?;

        debug!(present = kv.data.data.key.is_some(), "KV read succeeded");
        Ok(kv.data.data.key)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}
