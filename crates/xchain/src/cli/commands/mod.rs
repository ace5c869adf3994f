//! # CLI Command Handlers
//!
//! - [`protocols`] - print the capability matrix
//! - [`address`] - derive addresses from a public key
//! - [`config`] - show, locate or create `chains.toml`
//!
//! Handlers write their output to a caller-supplied writer and return
//! [`CommandError`]; `main` maps errors to [`exit_codes`].

pub mod address;
pub mod config;
pub mod exit_codes;
pub mod protocols;

use std::path::PathBuf;

use xchain_core::asset::NativeAsset;
use xchain_core::config::{ChainConfig, ChainsConfig};
use xchain_core::config_loader::ConfigLoader;
use xchain_core::error::{AddressError, ConfigError, XChainError};

pub use address::AddressCommand;
pub use config::ConfigCommand;
pub use protocols::ProtocolsCommand;

/// Errors a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Loading or writing the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Resolving a capability failed.
    #[error(transparent)]
    XChain(#[from] XChainError),

    /// Address derivation failed.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The public key argument is not hex.
    #[error("invalid public key hex: {0}")]
    PublicKeyHex(String),

    /// `config init` would overwrite an existing file.
    #[error("{0} already exists; pass --force to overwrite")]
    AlreadyInitialized(String),

    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Configuration loader for `home`, or for `~/.xchain` when unset.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if `home` is unset and the home
/// directory cannot be determined.
pub fn config_loader(home: Option<PathBuf>) -> Result<ConfigLoader, ConfigError> {
    match home {
        Some(dir) => Ok(ConfigLoader::with_base_dir(dir)),
        None => ConfigLoader::new(),
    }
}

/// The configuration of `chain`: the configured entry, else the built-in
/// default entry, else the bare asset mapping.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the configuration file exists but does not
/// load.
pub fn chain_config(loader: &ConfigLoader, chain: NativeAsset) -> Result<ChainConfig, ConfigError> {
    if let Some(configured) = loader.load()?.get(chain) {
        return Ok(configured.clone());
    }
    let defaults: ChainsConfig = toml::from_str(&ChainsConfig::default_toml())
        .map_err(|e| ConfigError::parse_failed(format!("built-in defaults: {e}")))?;
    tracing::debug!(%chain, "chain not configured, using built-in defaults");
    Ok(defaults
        .get(chain)
        .cloned()
        .unwrap_or_else(|| ChainConfig::new(chain)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_chain_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = config_loader(Some(dir.path().to_path_buf())).unwrap();
        let atom = chain_config(&loader, NativeAsset::Atom).unwrap();
        assert_eq!(atom.chain_prefix, "cosmos");

        let matic = chain_config(&loader, NativeAsset::Matic).unwrap();
        assert_eq!(matic.chain, NativeAsset::Matic);
    }

    #[test]
    fn test_configured_entry_wins() {
        let dir = TempDir::new().unwrap();
        let loader = config_loader(Some(dir.path().to_path_buf())).unwrap();
        let custom = ChainConfig::new(NativeAsset::Atom)
            .with_chain_prefix("cosmostest")
            .with_chain_id("theta-testnet-001");
        loader
            .save(&ChainsConfig {
                chains: vec![custom.clone()],
            })
            .unwrap();
        assert_eq!(chain_config(&loader, NativeAsset::Atom).unwrap(), custom);
    }
}
