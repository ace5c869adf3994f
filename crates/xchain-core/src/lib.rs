//! # xchain-core
//!
//! Core types and error definitions for the xchain cross-chain custody layer.
//!
//! This crate holds the data model shared by every other xchain crate. It
//! contains no cryptography and no chain-specific encoding.
//!
//! ## Modules
//!
//! - [`protocol`] - [`Protocol`] identifiers and the capability matrix
//! - [`asset`] - [`NativeAsset`] symbols, token and staking task configuration
//! - [`variant`] - The `protocols/<protocol>/<op>/<provider>` variant tag
//! - [`types`] - Addresses, transfer arguments, sighashes and signatures
//! - [`config`] - Per-chain configuration ([`ChainConfig`])
//! - [`config_loader`] - Loading `~/.xchain/chains.toml`
//! - [`error`] - Error types and result aliases
//!
//! ## Capability matrix
//!
//! ```rust
//! use xchain_core::{Protocol, SignatureAlgorithm, SUPPORTED_PROTOCOLS};
//!
//! for protocol in &SUPPORTED_PROTOCOLS {
//!     assert!(protocol.signature_algorithm().is_some());
//!     assert!(protocol.public_key_format().is_some());
//! }
//! assert_eq!(Protocol::SOLANA.signature_algorithm(), Some(SignatureAlgorithm::Ed25519));
//! ```
//!
//! ## Variant tags
//!
//! ```rust
//! use xchain_core::{Protocol, StakingProvider, TxVariantInputType};
//!
//! let tag = TxVariantInputType::staking(&Protocol::COSMOS, StakingProvider::Native);
//! assert_eq!(tag.as_str(), "protocols/cosmos/staking/native");
//! assert!(tag.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod asset;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod protocol;
pub mod types;
pub mod variant;

// Re-export error types at crate root for convenience
pub use error::{
    AddressError, BuildError, ConfigError, DefectError, RegistryError, Result, SignError,
    TaskError, VariantError, XChainError,
};

// Re-export the capability matrix
pub use protocol::{Protocol, PublicKeyFormat, SignatureAlgorithm, SUPPORTED_PROTOCOLS};

// Re-export asset and variant types
pub use asset::{AssetConfig, NativeAsset, TaskConfig, TaskOperation, TokenAssetConfig};
pub use variant::{InputKind, Operation, StakingProvider, TxVariantInputType};

// Re-export configuration
pub use config::{ChainConfig, ChainsConfig, ClientConfig, Network};
pub use config_loader::{expand_path, load_config, ConfigLoader};

// Re-export value types
pub use types::{
    Address, AddressType, PossibleAddress, SighashPayload, TransferArgs, TxHash, TxSignature,
};

// Re-export U256 from alloy_primitives for working with amounts
pub use alloy_primitives::U256;
