//! # xchain-chain
//!
//! Per-chain address derivation and transaction construction for the xchain
//! cross-chain custody layer.
//!
//! Every protocol plugs the same three contracts into the
//! [`ProtocolRegistry`]:
//!
//! - [`Client`] - connection handle for fetching chain state
//! - [`AddressBuilder`] - public key to address
//! - [`TxBuilder`] - transfer arguments plus [`TxInput`] to an unsigned [`Tx`]
//!
//! Signers come from [`xchain_crypto`] and are resolved through the same
//! registry.
//!
//! ## Signing flow
//!
//! ```rust
//! use xchain_chain::ProtocolRegistry;
//! use xchain_chain::evm::EvmInput;
//! use xchain_chain::input::{ChainInput, TxInput};
//! use xchain_core::{Address, ChainConfig, NativeAsset, TransferArgs, U256};
//!
//! let registry = ProtocolRegistry::new();
//! let config = ChainConfig::new(NativeAsset::Eth).with_chain_id("1");
//! let secret = "0000000000000000000000000000000000000000000000000000000000000001";
//!
//! let signer = registry.resolve_signer(&config, secret).expect("signer");
//! let from = registry
//!     .resolve_address_builder(&config)
//!     .expect("address builder")
//!     .address_from_public_key(&signer.public_key().expect("public key"))
//!     .expect("address");
//!
//! let args = TransferArgs::new(
//!     from,
//!     Address::new("0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"),
//!     U256::from(1_000u64),
//! );
//! let input = TxInput::new(ChainInput::Evm(EvmInput {
//!     gas_limit: 21_000,
//!     gas_fee_cap: 30_000_000_000,
//!     gas_tip_cap: 1_000_000_000,
//!     ..EvmInput::default()
//! }));
//!
//! let builder = registry.resolve_tx_builder(&config).expect("tx builder");
//! let mut tx = builder.new_transfer(&args, &input).expect("transfer");
//! assert!(tx.hash().is_empty());
//!
//! let signatures = tx
//!     .sighashes()
//!     .expect("sighashes")
//!     .iter()
//!     .map(|payload| signer.sign(payload.as_bytes()))
//!     .collect::<Result<Vec<_>, _>>()
//!     .expect("signed");
//! tx.add_signatures(&signatures).expect("attached");
//! assert!(tx.hash().as_str().starts_with("0x"));
//! ```
//!
//! ## Protocols
//!
//! - [`btc`] - bitcoin-style UTXO chains
//! - [`btc_cash`] - bitcoin cash, decorating [`btc`] with cashaddr
//! - [`cosmos`] - Cosmos SDK amino transactions and staking tasks
//! - [`evm`] - EIP-1559 transactions and ERC-20 transfers
//! - [`evm_legacy`] - [`evm`] with legacy gas pricing
//! - [`solana`] - system and SPL token transfers
//! - [`tron`] - TRX and TRC-20 transfers
//! - [`ton`] - wallet v4r2 TON and jetton transfers

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod address;
pub mod builder;
pub mod client;
pub mod input;
pub mod registry;

pub mod btc;
pub mod btc_cash;
pub mod cosmos;
pub mod evm;
pub mod evm_legacy;
pub mod solana;
pub mod ton;
pub mod tron;

// Re-export the contracts at crate root for convenience
pub use address::AddressBuilder;
pub use builder::{Tx, TxBuilder};
pub use client::Client;
pub use input::{ChainInput, TxInput};

// Re-export the registry
pub use registry::{ProtocolEntry, ProtocolRegistry, RegistryBuilder};

// Re-export the signer contract
pub use xchain_crypto::Signer;
