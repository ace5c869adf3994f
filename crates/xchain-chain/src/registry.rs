//! Protocol registry.
//!
//! The [`ProtocolRegistry`] maps a [`Protocol`] to constructors for its four
//! capabilities: [`Client`], [`AddressBuilder`], [`TxBuilder`] and
//! [`Signer`]. Every resolve call is keyed by [`ChainConfig::protocol`].
//!
//! # Design
//!
//! - **Two phases**: a [`RegistryBuilder`] is filled during initialisation and
//!   frozen by [`RegistryBuilder::build`]. The frozen registry has no write
//!   methods.
//! - **Cheap to share**: the frozen registry is an [`Arc`] around its table
//!   and can be cloned into any number of threads.
//! - **Decoration**: constructors receive the registry itself, so a protocol
//!   that is "almost" another one can build the other protocol's instance and
//!   return it with one capability substituted.
//!
//! # Example
//!
//! ```
//! use xchain_chain::ProtocolRegistry;
//! use xchain_core::{ChainConfig, NativeAsset, Protocol};
//!
//! let registry = ProtocolRegistry::new();
//! assert!(registry.supports(&Protocol::EVM));
//!
//! let eth = ChainConfig::new(NativeAsset::Eth);
//! let builder = registry.resolve_address_builder(&eth).expect("evm is registered");
//! let _ = builder;
//!
//! let unknown = ChainConfig::new(NativeAsset::Eth).with_protocol(Protocol::from("unknown"));
//! let err = registry.resolve_client(&unknown).unwrap_err();
//! assert_eq!(err.to_string(), "creator unknown not found");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use xchain_core::config::ChainConfig;
use xchain_core::error::{RegistryError, XChainError};
use xchain_core::protocol::{Protocol, SUPPORTED_PROTOCOLS};
use xchain_crypto::{LocalSigner, Signer};

use crate::address::AddressBuilder;
use crate::builder::TxBuilder;
use crate::client::{Client, RpcClient};
use crate::{btc, btc_cash, cosmos, evm, evm_legacy, solana, ton, tron};

/// Builds a [`Client`] for a chain.
pub type ClientConstructor = Arc<
    dyn Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn Client>, XChainError> + Send + Sync,
>;

/// Builds an [`AddressBuilder`] for a chain.
pub type AddressBuilderConstructor = Arc<
    dyn Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn AddressBuilder>, XChainError>
        + Send
        + Sync,
>;

/// Builds a [`TxBuilder`] for a chain.
pub type TxBuilderConstructor = Arc<
    dyn Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn TxBuilder>, XChainError>
        + Send
        + Sync,
>;

/// Builds a [`Signer`] for a chain from a secret.
pub type SignerConstructor =
    Arc<dyn Fn(&ChainConfig, &str) -> Result<Box<dyn Signer>, XChainError> + Send + Sync>;

// ============================================================================
// ProtocolEntry
// ============================================================================

/// The constructors registered for one protocol.
#[derive(Clone, Default)]
pub struct ProtocolEntry {
    client: Option<ClientConstructor>,
    address_builder: Option<AddressBuilderConstructor>,
    tx_builder: Option<TxBuilderConstructor>,
    signer: Option<SignerConstructor>,
}

impl ProtocolEntry {
    /// An entry with no capabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client constructor.
    #[must_use]
    pub fn with_client<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn Client>, XChainError>
            + Send
            + Sync
            + 'static,
    {
        self.client = Some(Arc::new(constructor));
        self
    }

    /// Set the address builder constructor.
    #[must_use]
    pub fn with_address_builder<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn AddressBuilder>, XChainError>
            + Send
            + Sync
            + 'static,
    {
        self.address_builder = Some(Arc::new(constructor));
        self
    }

    /// Set the transaction builder constructor.
    #[must_use]
    pub fn with_tx_builder<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn TxBuilder>, XChainError>
            + Send
            + Sync
            + 'static,
    {
        self.tx_builder = Some(Arc::new(constructor));
        self
    }

    /// Set the signer constructor.
    #[must_use]
    pub fn with_signer<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&ChainConfig, &str) -> Result<Box<dyn Signer>, XChainError> + Send + Sync + 'static,
    {
        self.signer = Some(Arc::new(constructor));
        self
    }

    fn capabilities(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            self.client.as_ref().map(|_| "client"),
            self.address_builder.as_ref().map(|_| "address builder"),
            self.tx_builder.as_ref().map(|_| "tx-builder"),
            self.signer.as_ref().map(|_| "signer"),
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Debug for ProtocolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.capabilities()).finish()
    }
}

// ============================================================================
// RegistryBuilder
// ============================================================================

/// Initialisation phase of a [`ProtocolRegistry`].
///
/// Registration is single-threaded and additive: a capability can be set
/// once per protocol.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<Protocol, ProtocolEntry>,
}

impl RegistryBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `entry` into the constructors registered for `protocol`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if any capability of
    /// `entry` is already present; nothing is registered in that case.
    pub fn register(
        &mut self,
        protocol: Protocol,
        entry: ProtocolEntry,
    ) -> Result<&mut Self, RegistryError> {
        if let Some(existing) = self.entries.get(&protocol) {
            let taken = existing.capabilities().find(|name| entry.capabilities().any(|n| n == *name));
            if let Some(name) = taken {
                return Err(RegistryError::already_registered(protocol.as_str(), name));
            }
        }

        let slot = self.entries.entry(protocol).or_default();
        if entry.client.is_some() {
            slot.client = entry.client;
        }
        if entry.address_builder.is_some() {
            slot.address_builder = entry.address_builder;
        }
        if entry.tx_builder.is_some() {
            slot.tx_builder = entry.tx_builder;
        }
        if entry.signer.is_some() {
            slot.signer = entry.signer;
        }
        Ok(self)
    }

    /// Register a client constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if one is already set.
    pub fn register_client<F>(
        &mut self,
        protocol: Protocol,
        constructor: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn Client>, XChainError>
            + Send
            + Sync
            + 'static,
    {
        self.register(protocol, ProtocolEntry::new().with_client(constructor))
    }

    /// Register an address builder constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if one is already set.
    pub fn register_address_builder<F>(
        &mut self,
        protocol: Protocol,
        constructor: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn AddressBuilder>, XChainError>
            + Send
            + Sync
            + 'static,
    {
        self.register(protocol, ProtocolEntry::new().with_address_builder(constructor))
    }

    /// Register a transaction builder constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if one is already set.
    pub fn register_tx_builder<F>(
        &mut self,
        protocol: Protocol,
        constructor: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&ChainConfig, &ProtocolRegistry) -> Result<Box<dyn TxBuilder>, XChainError>
            + Send
            + Sync
            + 'static,
    {
        self.register(protocol, ProtocolEntry::new().with_tx_builder(constructor))
    }

    /// Register a signer constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if one is already set.
    pub fn register_signer<F>(
        &mut self,
        protocol: Protocol,
        constructor: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&ChainConfig, &str) -> Result<Box<dyn Signer>, XChainError> + Send + Sync + 'static,
    {
        self.register(protocol, ProtocolEntry::new().with_signer(constructor))
    }

    /// Freeze the table.
    #[must_use]
    pub fn build(self) -> ProtocolRegistry {
        ProtocolRegistry {
            entries: Arc::new(self.entries),
        }
    }
}

// ============================================================================
// ProtocolRegistry
// ============================================================================

/// Read-only table of protocol constructors.
#[derive(Clone)]
pub struct ProtocolRegistry {
    entries: Arc<HashMap<Protocol, ProtocolEntry>>,
}

impl ProtocolRegistry {
    /// A registry with every supported protocol.
    #[must_use]
    pub fn new() -> Self {
        let mut builder = RegistryBuilder::new();
        for (protocol, entry) in default_entries() {
            // Each protocol appears once in the default table.
            if let Err(err) = builder.register(protocol, entry) {
                tracing::error!(error = %err, "duplicate default registration");
            }
        }
        builder.build()
    }

    /// A registry with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        RegistryBuilder::new().build()
    }

    /// Start a custom registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build the client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `"creator <protocol> not found"` if the protocol has no client,
    /// or whatever the constructor returns.
    pub fn resolve_client(&self, config: &ChainConfig) -> Result<Box<dyn Client>, XChainError> {
        tracing::debug!(protocol = %config.protocol, chain = config.id(), "resolving client");
        let constructor = self
            .entry(&config.protocol)
            .and_then(|e| e.client.as_ref())
            .ok_or_else(|| RegistryError::client_not_found(config.protocol.as_str()))?;
        constructor(config, self)
    }

    /// Build the address builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns `"no address builder defined for: <chain>"` if the protocol
    /// has none, or whatever the constructor returns.
    pub fn resolve_address_builder(
        &self,
        config: &ChainConfig,
    ) -> Result<Box<dyn AddressBuilder>, XChainError> {
        tracing::debug!(protocol = %config.protocol, chain = config.id(), "resolving address builder");
        let constructor = self
            .entry(&config.protocol)
            .and_then(|e| e.address_builder.as_ref())
            .ok_or_else(|| RegistryError::address_builder_not_found(config.id()))?;
        constructor(config, self)
    }

    /// Build the transaction builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns `"no tx-builder defined for: <chain>"` if the protocol has
    /// none, or whatever the constructor returns.
    pub fn resolve_tx_builder(
        &self,
        config: &ChainConfig,
    ) -> Result<Box<dyn TxBuilder>, XChainError> {
        tracing::debug!(protocol = %config.protocol, chain = config.id(), "resolving tx-builder");
        let constructor = self
            .entry(&config.protocol)
            .and_then(|e| e.tx_builder.as_ref())
            .ok_or_else(|| RegistryError::tx_builder_not_found(config.id()))?;
        constructor(config, self)
    }

    /// Build a signer for `config` holding `secret`.
    ///
    /// # Errors
    ///
    /// Returns `"no signer defined for: <chain>"` if the protocol has none,
    /// or whatever the constructor returns.
    pub fn resolve_signer(
        &self,
        config: &ChainConfig,
        secret: &str,
    ) -> Result<Box<dyn Signer>, XChainError> {
        tracing::debug!(protocol = %config.protocol, chain = config.id(), "resolving signer");
        let constructor = self
            .entry(&config.protocol)
            .and_then(|e| e.signer.as_ref())
            .ok_or_else(|| RegistryError::signer_not_found(config.id()))?;
        constructor(config, secret)
    }

    /// Registered protocols, supported ones first in canonical order, then
    /// any others sorted by name.
    #[must_use]
    pub fn supported_protocols(&self) -> Vec<Protocol> {
        let mut protocols: Vec<Protocol> = SUPPORTED_PROTOCOLS
            .iter()
            .filter(|p| self.entries.contains_key(*p))
            .cloned()
            .collect();
        let mut extra: Vec<Protocol> = self
            .entries
            .keys()
            .filter(|p| !p.is_supported())
            .cloned()
            .collect();
        extra.sort();
        protocols.extend(extra);
        protocols
    }

    /// Returns `true` if anything is registered for `protocol`.
    #[must_use]
    pub fn supports(&self, protocol: &Protocol) -> bool {
        self.entries.contains_key(protocol)
    }

    /// Number of registered protocols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, protocol: &Protocol) -> Option<&ProtocolEntry> {
        self.entries.get(protocol)
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolRegistry")
            .field("protocols", &self.supported_protocols())
            .finish()
    }
}

// ============================================================================
// Default table
// ============================================================================

fn local_signer(config: &ChainConfig, secret: &str) -> Result<Box<dyn Signer>, XChainError> {
    Ok(Box::new(LocalSigner::new(&config.protocol, secret)?))
}

fn rpc_client(config: &ChainConfig, _: &ProtocolRegistry) -> Result<Box<dyn Client>, XChainError> {
    Ok(Box::new(RpcClient::new(config)))
}

fn btc_entry() -> ProtocolEntry {
    ProtocolEntry::new()
        .with_client(|cfg, _| Ok(Box::new(btc::BtcClient::new(cfg)?)))
        .with_address_builder(|cfg, _| Ok(Box::new(btc::BtcAddressBuilder::new(cfg)?)))
        .with_tx_builder(|cfg, _| Ok(Box::new(btc::BtcTxBuilder::new(cfg)?)))
        .with_signer(local_signer)
}

fn cosmos_entry() -> ProtocolEntry {
    ProtocolEntry::new()
        .with_client(rpc_client)
        .with_address_builder(|cfg, _| Ok(Box::new(cosmos::CosmosAddressBuilder::new(cfg)?)))
        .with_tx_builder(|cfg, _| Ok(Box::new(cosmos::CosmosTxBuilder::new(cfg)?)))
        .with_signer(local_signer)
}

fn default_entries() -> Vec<(Protocol, ProtocolEntry)> {
    vec![
        (Protocol::BTC, btc_entry()),
        (
            Protocol::BTC_CASH,
            ProtocolEntry::new()
                .with_client(|cfg, _| Ok(Box::new(btc_cash::BchClient::new(cfg)?)))
                .with_address_builder(|cfg, _| {
                    Ok(Box::new(btc_cash::BchAddressBuilder::new(cfg)?))
                })
                .with_tx_builder(|cfg, _| Ok(Box::new(btc_cash::BchTxBuilder::new(cfg)?)))
                .with_signer(local_signer),
        ),
        (Protocol::BTC_LEGACY, btc_entry()),
        (Protocol::COSMOS, cosmos_entry()),
        (Protocol::EVMOS, cosmos_entry()),
        (
            Protocol::EVM,
            ProtocolEntry::new()
                .with_client(rpc_client)
                .with_address_builder(|cfg, _| Ok(Box::new(evm::EvmAddressBuilder::new(cfg))))
                .with_tx_builder(|cfg, _| Ok(Box::new(evm::EvmTxBuilder::new(cfg))))
                .with_signer(local_signer),
        ),
        (
            Protocol::EVM_LEGACY,
            ProtocolEntry::new()
                .with_client(rpc_client)
                .with_address_builder(evm_legacy::address_builder)
                .with_tx_builder(|cfg, _| Ok(Box::new(evm_legacy::tx_builder(cfg))))
                .with_signer(local_signer),
        ),
        (
            Protocol::SOLANA,
            ProtocolEntry::new()
                .with_client(rpc_client)
                .with_address_builder(|cfg, _| Ok(Box::new(solana::SolanaAddressBuilder::new(cfg))))
                .with_tx_builder(|cfg, _| Ok(Box::new(solana::SolanaTxBuilder::new(cfg))))
                .with_signer(local_signer),
        ),
        (
            Protocol::TRON,
            ProtocolEntry::new()
                .with_client(rpc_client)
                .with_address_builder(|cfg, _| Ok(Box::new(tron::TronAddressBuilder::new(cfg))))
                .with_tx_builder(|cfg, _| Ok(Box::new(tron::TronTxBuilder::new(cfg))))
                .with_signer(local_signer),
        ),
        (
            Protocol::TON,
            ProtocolEntry::new()
                .with_client(|cfg, _| Ok(Box::new(ton::TonClient::new(cfg))))
                .with_address_builder(|cfg, _| Ok(Box::new(ton::TonAddressBuilder::new(cfg)?)))
                .with_tx_builder(|cfg, _| Ok(Box::new(ton::TonTxBuilder::new(cfg)?)))
                .with_signer(local_signer),
        ),
    ]
}
