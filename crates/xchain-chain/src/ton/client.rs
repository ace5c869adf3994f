//! TON client handle: tonapi or a liteserver.

use std::fmt;

use xchain_core::config::ChainConfig;
use xchain_core::protocol::Protocol;

use crate::client::{non_empty, redacted, Client};

/// Which backend a [`TonClient`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonProvider {
    /// The tonapi HTTP API.
    TonApi,
    /// A liteserver endpoint.
    Liteserver,
}

impl TonProvider {
    /// Provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TonApi => "tonapi",
            Self::Liteserver => "liteserver",
        }
    }
}

/// Client handle for ton.
#[derive(Clone)]
pub struct TonClient {
    protocol: Protocol,
    provider: TonProvider,
    auth: String,
    url: String,
}

impl TonClient {
    /// Client for `config`. Any provider other than `liteserver` selects tonapi.
    #[must_use]
    pub fn new(config: &ChainConfig) -> Self {
        let provider = match config.client.provider.as_str() {
            "liteserver" => TonProvider::Liteserver,
            _ => TonProvider::TonApi,
        };
        Self {
            protocol: config.protocol.clone(),
            provider,
            auth: config.client.auth.clone(),
            url: config.client.url.clone(),
        }
    }

    /// Selected backend.
    #[must_use]
    pub const fn backend(&self) -> TonProvider {
        self.provider
    }
}

impl Client for TonClient {
    fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    fn provider(&self) -> &str {
        self.provider.as_str()
    }

    fn endpoint(&self) -> Option<&str> {
        non_empty(&self.url)
    }
}

impl fmt::Debug for TonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TonClient")
            .field("provider", &self.provider)
            .field("auth", &redacted(&self.auth))
            .field("url", &self.url)
            .finish()
    }
}
