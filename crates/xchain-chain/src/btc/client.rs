//! Bitcoin-family client handle.

use std::fmt;
use std::sync::Arc;

use bitcoin::ScriptBuf;
use xchain_core::config::ChainConfig;
use xchain_core::error::{AddressError, ConfigError};
use xchain_core::protocol::Protocol;

use super::address::{AddressCodec, Base58Codec};
use super::params::ChainParams;
use crate::client::{non_empty, redacted, require_auth, Client};

/// Indexer backing a bitcoin-family client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtcProvider {
    /// Blockchair API; needs an api key.
    Blockchair,
    /// A node's JSON-RPC; needs an endpoint.
    Native,
}

impl BtcProvider {
    /// Provider name as configured.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blockchair => "blockchair",
            Self::Native => "native",
        }
    }

    fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "" | "blockchair" => Ok(Self::Blockchair),
            "native" => Ok(Self::Native),
            other => Err(ConfigError::invalid_value(
                "client.provider",
                format!("unknown bitcoin provider {other}"),
            )),
        }
    }
}

/// Client for btc, btc-legacy and, with a CashAddr codec, btc-cash chains.
#[derive(Clone)]
pub struct BtcClient {
    protocol: Protocol,
    provider: BtcProvider,
    auth: String,
    url: String,
    params: ChainParams,
    codec: Arc<dyn AddressCodec>,
}

impl BtcClient {
    /// Client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown provider, a
    /// Blockchair provider without an api key, a native provider without an
    /// endpoint, or a non bitcoin-family chain.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        let provider = BtcProvider::parse(&config.client.provider)?;
        match provider {
            BtcProvider::Blockchair => require_auth(config, provider.as_str())?,
            BtcProvider::Native if config.client.url.is_empty() => {
                return Err(ConfigError::invalid_value(
                    "client.url",
                    format!("provider native for {} requires an endpoint", config.id()),
                ))
            }
            BtcProvider::Native => {}
        }
        Ok(Self {
            protocol: config.protocol.clone(),
            provider,
            auth: config.client.auth.clone(),
            url: config.client.url.clone(),
            params: ChainParams::from_config(config)?,
            codec: Arc::new(Base58Codec),
        })
    }

    /// Replace the codec used to decode addresses.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn AddressCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Selected provider.
    #[must_use]
    pub const fn btc_provider(&self) -> BtcProvider {
        self.provider
    }

    /// Output script of `address`, as used to query its outputs.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidFormat`] if the address is not valid
    /// for the chain.
    pub fn decode_address(&self, address: &str) -> Result<ScriptBuf, AddressError> {
        self.codec.decode(address, &self.params)
    }
}

impl Client for BtcClient {
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

impl fmt::Debug for BtcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BtcClient")
            .field("protocol", &self.protocol)
            .field("provider", &self.provider)
            .field("auth", &redacted(&self.auth))
            .field("url", &self.url)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
