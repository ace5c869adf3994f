//! Chain configuration.
//!
//! A [`ChainConfig`] is owned by the caller and describes one chain: which
//! protocol it speaks, its address prefix, client connection parameters and
//! free-form default parameters consulted by task dispatch. Builders read it
//! and never modify it.
//!
//! [`ChainsConfig`] is the on-disk form: a list of chains stored as TOML at
//! `~/.xchain/chains.toml`.
//!
//! # Example
//!
//! ```
//! use xchain_core::config::{ChainConfig, ChainsConfig};
//! use xchain_core::{NativeAsset, Protocol};
//!
//! let config: ChainsConfig = toml::from_str(r#"
//! [[chain]]
//! chain = "ATOM"
//! protocol = "cosmos"
//! chain_prefix = "cosmos"
//! chain_id = "cosmoshub-4"
//! chain_coin = "uatom"
//! decimals = 6
//!
//! [chain.default_params]
//! validator_address = "cosmosvaloper1abc"
//! "#).expect("valid TOML");
//!
//! let atom = config.get(NativeAsset::Atom).expect("configured");
//! assert_eq!(atom.protocol, Protocol::COSMOS);
//! assert_eq!(atom.param("validator_address"), Some("cosmosvaloper1abc"));
//! assert_eq!(atom.id(), "ATOM");
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::NativeAsset;
use crate::error::ConfigError;
use crate::protocol::Protocol;

// ============================================================================
// Network
// ============================================================================

/// Which network of a chain the configuration targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
}

impl Network {
    /// Returns `true` for [`Network::Mainnet`].
    #[must_use]
    pub const fn is_mainnet(self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
        }
    }
}

// ============================================================================
// ClientConfig
// ============================================================================

/// Connection parameters of a chain client.
///
/// Only carried here; this layer performs no I/O.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Provider name (e.g. `blockchair`, `tonapi`). Empty selects the
    /// protocol's default provider.
    #[serde(default)]
    pub provider: String,

    /// Provider credential.
    #[serde(default)]
    pub auth: String,

    /// Endpoint URL.
    #[serde(default)]
    pub url: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = if self.auth.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("ClientConfig")
            .field("provider", &self.provider)
            .field("auth", &auth)
            .field("url", &self.url)
            .finish()
    }
}

// ============================================================================
// ChainConfig
// ============================================================================

/// Configuration of a single chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// The chain's native asset; doubles as the chain identifier.
    pub chain: NativeAsset,

    /// Protocol used to resolve builders.
    pub protocol: Protocol,

    /// Address human-readable prefix (bech32 HRP, CashAddr prefix).
    #[serde(default)]
    pub chain_prefix: String,

    /// Network identifier: EVM chain id, Cosmos chain id, TON workchain.
    #[serde(default)]
    pub chain_id: String,

    /// Base denomination of the native coin (`uatom`, `aevmos`).
    #[serde(default)]
    pub chain_coin: String,

    /// Decimals of the native coin.
    #[serde(default)]
    pub decimals: u8,

    /// Mainnet or testnet.
    #[serde(default)]
    pub network: Network,

    /// Upper bound for the EVM priority fee, in gwei. Protocol default when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tip_cap_gwei: Option<u64>,

    /// Client connection parameters.
    #[serde(default)]
    pub client: ClientConfig,

    /// Task parameters shared by every task on this chain.
    #[serde(default)]
    pub default_params: BTreeMap<String, String>,
}

impl ChainConfig {
    /// Minimal configuration for `chain`, with the protocol taken from the
    /// asset mapping.
    #[must_use]
    pub fn new(chain: NativeAsset) -> Self {
        Self {
            chain,
            protocol: chain.protocol().unwrap_or_else(|| Protocol::from("")),
            chain_prefix: String::new(),
            chain_id: String::new(),
            chain_coin: String::new(),
            decimals: 0,
            network: Network::Mainnet,
            max_tip_cap_gwei: None,
            client: ClientConfig::default(),
            default_params: BTreeMap::new(),
        }
    }

    /// Chain identifier used in error messages.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.chain.as_str()
    }

    /// Override the protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the address prefix.
    #[must_use]
    pub fn with_chain_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.chain_prefix = prefix.into();
        self
    }

    /// Set the network identifier.
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    /// Set the base denomination.
    #[must_use]
    pub fn with_chain_coin(mut self, coin: impl Into<String>) -> Self {
        self.chain_coin = coin.into();
        self
    }

    /// Set the native coin decimals.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Set the network.
    #[must_use]
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the client configuration.
    #[must_use]
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Add a default parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }

    /// Look up a default parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.default_params.get(key).map(String::as_str)
    }
}

// ============================================================================
// ChainsConfig
// ============================================================================

/// The set of configured chains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainsConfig {
    /// Configured chains, at most one per native asset.
    #[serde(default, rename = "chain")]
    pub chains: Vec<ChainConfig>,
}

impl ChainsConfig {
    /// Returns the configuration of `chain`.
    #[must_use]
    pub fn get(&self, chain: NativeAsset) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain == chain)
    }

    /// Returns the configuration of `chain` or an error naming it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChainNotConfigured`] if `chain` is absent.
    pub fn require(&self, chain: NativeAsset) -> Result<&ChainConfig, ConfigError> {
        self.get(chain)
            .ok_or_else(|| ConfigError::chain_not_configured(chain.as_str()))
    }

    /// Checks for duplicate chains and for bech32 chains without a prefix.
    ///
    /// Unknown protocols are accepted here; they are reported when a builder
    /// is resolved for them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.chain) {
                return Err(ConfigError::invalid_value(
                    "chain",
                    format!("{} configured more than once", chain.chain),
                ));
            }
            let needs_prefix = chain.protocol == Protocol::COSMOS
                || chain.protocol == Protocol::EVMOS
                || chain.protocol == Protocol::BTC_CASH;
            if needs_prefix && chain.chain_prefix.is_empty() {
                return Err(ConfigError::invalid_value(
                    "chain_prefix",
                    format!("{} requires an address prefix", chain.chain),
                ));
            }
        }
        Ok(())
    }

    /// The default configuration file content: one mainnet entry per
    /// supported protocol family.
    #[must_use]
    pub fn default_toml() -> String {
        r#"# xchain chain configuration

[[chain]]
chain = "BTC"
protocol = "btc"
decimals = 8

[[chain]]
chain = "BCH"
protocol = "btc-cash"
chain_prefix = "bitcoincash"
decimals = 8

[[chain]]
chain = "DOGE"
protocol = "btc-legacy"
decimals = 8

[[chain]]
chain = "LTC"
protocol = "btc-legacy"
decimals = 8

[[chain]]
chain = "ATOM"
protocol = "cosmos"
chain_prefix = "cosmos"
chain_id = "cosmoshub-4"
chain_coin = "uatom"
decimals = 6

[chain.default_params]
# validator_address = "cosmosvaloper1..."

[[chain]]
chain = "EVMOS"
protocol = "evmos"
chain_prefix = "evmos"
chain_id = "evmos_9001-2"
chain_coin = "aevmos"
decimals = 18

[[chain]]
chain = "ETH"
protocol = "evm"
chain_id = "1"
decimals = 18

[[chain]]
chain = "BNB"
protocol = "evm-legacy"
chain_id = "56"
decimals = 18

[[chain]]
chain = "SOL"
protocol = "solana"
decimals = 9

[[chain]]
chain = "TRX"
protocol = "tron"
decimals = 6

[[chain]]
chain = "TON"
protocol = "ton"
chain_id = "0"
decimals = 9

[chain.client]
provider = "tonapi"
"#
        .to_string()
    }
}
