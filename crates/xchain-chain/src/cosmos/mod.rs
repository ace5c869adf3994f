//! Cosmos SDK chains: cosmos (secp256k1, SHA-256) and evmos (ethermint
//! keys, KECCAK-256).
//!
//! Transactions use the amino JSON sign mode.
//!
//! # Example
//!
//! ```
//! use xchain_chain::address::AddressBuilder;
//! use xchain_chain::cosmos::CosmosAddressBuilder;
//! use xchain_core::{ChainConfig, NativeAsset};
//!
//! let config = ChainConfig::new(NativeAsset::Atom).with_chain_prefix("cosmos");
//! let builder = CosmosAddressBuilder::new(&config).expect("prefix");
//! let key = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
//!     .expect("hex");
//!
//! let address = builder.address_from_public_key(&key).expect("valid key");
//! assert!(address.as_str().starts_with("cosmos1"));
//! ```

pub mod address;
pub mod builder;
pub mod tx;

pub use address::{decode_address, CosmosAddressBuilder, KeyHashing};
pub use builder::{CosmosInput, CosmosTxBuilder, COSMOS_TASK_ROUTES};
pub use tx::{AminoMsg, Coin, CosmosTx, SignHashing, StdFee, StdSignDoc, StdTx};
