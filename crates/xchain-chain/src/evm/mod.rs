//! EVM chains. The same types serve evm (EIP-1559) and evm-legacy
//! (EIP-155 gas price), see [`crate::evm_legacy`].
//!
//! # Example
//!
//! ```
//! use xchain_chain::builder::{Tx, TxBuilder};
//! use xchain_chain::evm::{gwei_to_wei, EvmInput, EvmTxBuilder};
//! use xchain_chain::input::{ChainInput, TxInput};
//! use xchain_core::{Address, ChainConfig, NativeAsset, TransferArgs, U256};
//!
//! let builder = EvmTxBuilder::new(&ChainConfig::new(NativeAsset::Eth).with_chain_id("1"));
//! let args = TransferArgs::new(
//!     Address::new("0x724435CC1B2821362c2CD425F2744Bd7347bf299"),
//!     Address::new("0x3ad57b83B2E3dC5648F32e98e386935A9B10bb9F"),
//!     U256::from(100u64),
//! );
//! let input = TxInput::new(ChainInput::Evm(EvmInput {
//!     nonce: 0,
//!     gas_limit: 21_000,
//!     gas_fee_cap: gwei_to_wei(30),
//!     gas_tip_cap: gwei_to_wei(2),
//!     chain_id: None,
//! }));
//!
//! let tx = builder.new_transfer(&args, &input).expect("valid transfer");
//! assert_eq!(tx.sighashes().expect("initialized").len(), 1);
//! ```

pub mod address;
pub mod builder;
pub mod tx;

pub use address::{account_from_public_key, parse_address, EvmAddressBuilder};
pub use builder::{
    erc20_transfer_data, gwei_to_wei, EvmInput, EvmTxBuilder, DEFAULT_MAX_TIP_CAP_GWEI,
    ERC20_TRANSFER_SELECTOR, GWEI,
};
pub use tx::{EvmTx, EvmTxFields, FeeMode};
