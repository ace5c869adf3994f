//! TON: wallet v4r2 addresses and external messages built from cells.
//!
//! # Example
//!
//! ```
//! use xchain_chain::address::AddressBuilder;
//! use xchain_chain::ton::TonAddressBuilder;
//! use xchain_core::asset::NativeAsset;
//! use xchain_core::config::ChainConfig;
//!
//! let builder = TonAddressBuilder::new(&ChainConfig::new(NativeAsset::Ton)).expect("config");
//! let address = builder.address_from_public_key(&[7u8; 32]).expect("32-byte key");
//! assert!(address.as_str().starts_with("EQ"));
//! ```

pub mod address;
pub mod builder;
pub mod cell;
pub mod client;
pub mod message;
pub mod tx;
pub mod wallet;

pub use address::{TonAddress, TonAddressBuilder, ADDRESS_FORMAT_PARAM};
pub use builder::{TonInput, TonTxBuilder, JETTON_FORWARD_TON, JETTON_TRANSFER_TON};
pub use cell::{to_boc, Cell, CellBuilder};
pub use client::{TonClient, TonProvider};
pub use message::{comment_body, internal_message, JettonTransfer, JETTON_TRANSFER_OP};
pub use tx::TonTx;
pub use wallet::{wallet_state_init, DEFAULT_WALLET_ID, WALLET_V4R2_CODE_HASH};
