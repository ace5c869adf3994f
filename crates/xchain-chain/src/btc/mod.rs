//! Bitcoin-family chains: btc (with native segwit) and btc-legacy
//! (base58-only chains such as DOGE and LTC).
//!
//! # Example
//!
//! ```
//! use xchain_chain::address::AddressBuilder;
//! use xchain_chain::btc::BtcAddressBuilder;
//! use xchain_core::{AddressType, ChainConfig, NativeAsset};
//!
//! let builder = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Btc)).expect("btc");
//! let key = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
//!     .expect("hex");
//!
//! let all = builder.all_possible_addresses_from_public_key(&key).expect("valid key");
//! assert_eq!(all[0].address_type, AddressType::SegWit);
//! assert_eq!(all[1].address.as_str(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
//! ```

pub mod address;
pub mod builder;
pub mod client;
pub mod input;
pub mod params;
pub mod tx;

pub use address::{pubkey_hash, AddressCodec, Base58Codec, BtcAddressBuilder};
pub use builder::{BtcTxBuilder, DUST_LIMIT};
pub use client::{BtcClient, BtcProvider};
pub use input::{BtcInput, Utxo};
pub use params::ChainParams;
pub use tx::{BtcTx, SpendKind};
