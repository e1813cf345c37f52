//! HTTP client module for the Vault API.
//!
//! This module provides the `VaultClient` for the two calls this process
//! makes: an AppRole login that yields a client token, and a KV v2 secret
//! read authenticated with that token.

pub mod client;
pub mod error;

pub use client::VaultClient;
pub use error::ApiError;
