//! Chain client handles.
//!
//! A [`Client`] carries the connection parameters (provider, credential,
//! endpoint) a network collaborator needs to fetch a
//! [`TxInput`](crate::input::TxInput) or broadcast a transaction. This layer
//! performs no I/O; clients only validate and expose their configuration.

use std::fmt;

use xchain_core::config::ChainConfig;
use xchain_core::error::ConfigError;
use xchain_core::protocol::Protocol;

/// Connection handle for one chain.
pub trait Client: Send + Sync + fmt::Debug {
    /// Protocol the client speaks.
    fn protocol(&self) -> &Protocol;

    /// Selected provider name.
    fn provider(&self) -> &str;

    /// Endpoint URL, if configured.
    fn endpoint(&self) -> Option<&str>;
}

/// Generic JSON-RPC style client used by account-based chains.
#[derive(Clone)]
pub struct RpcClient {
    protocol: Protocol,
    chain: &'static str,
    provider: String,
    auth: String,
    url: String,
}

impl RpcClient {
    /// Provider used when the configuration names none.
    pub const DEFAULT_PROVIDER: &'static str = "rpc";

    /// Client for `config`.
    #[must_use]
    pub fn new(config: &ChainConfig) -> Self {
        let provider = if config.client.provider.is_empty() {
            Self::DEFAULT_PROVIDER.to_string()
        } else {
            config.client.provider.clone()
        };
        Self {
            protocol: config.protocol.clone(),
            chain: config.id(),
            provider,
            auth: config.client.auth.clone(),
            url: config.client.url.clone(),
        }
    }

    /// Chain identifier.
    #[must_use]
    pub const fn chain(&self) -> &'static str {
        self.chain
    }

    /// Returns `true` if a credential is configured.
    #[must_use]
    pub fn has_auth(&self) -> bool {
        !self.auth.is_empty()
    }
}

impl Client for RpcClient {
    fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn endpoint(&self) -> Option<&str> {
        non_empty(&self.url)
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("protocol", &self.protocol)
            .field("chain", &self.chain)
            .field("provider", &self.provider)
            .field("auth", &redacted(&self.auth))
            .field("url", &self.url)
            .finish()
    }
}

/// Fails unless `config` carries a credential for `provider`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the chain and provider.
pub fn require_auth(config: &ChainConfig, provider: &str) -> Result<(), ConfigError> {
    if config.client.auth.is_empty() {
        Err(ConfigError::invalid_value(
            "client.auth",
            format!("provider {provider} for {} requires an api key", config.id()),
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) const fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use xchain_core::asset::NativeAsset;
    use xchain_core::config::ClientConfig;

    #[test]
    fn test_rpc_client_defaults() {
        let client = RpcClient::new(&ChainConfig::new(NativeAsset::Eth));
        assert_eq!(client.provider(), RpcClient::DEFAULT_PROVIDER);
        assert_eq!(client.endpoint(), None);
        assert_eq!(client.protocol(), &Protocol::EVM);
        assert!(!client.has_auth());
    }

    #[test]
    fn test_rpc_client_debug_redacts_auth() {
        let config = ChainConfig::new(NativeAsset::Sol).with_client(ClientConfig {
            provider: "helius".to_string(),
            auth: "secret-key".to_string(),
            url: "https://rpc.example".to_string(),
        });
        let client = RpcClient::new(&config);
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(client.endpoint(), Some("https://rpc.example"));
    }

    #[test]
    fn test_require_auth() {
        let config = ChainConfig::new(NativeAsset::Btc);
        let err = require_auth(&config, "blockchair").unwrap_err();
        assert!(err.to_string().contains("blockchair"));
    }
}
