//! Solana: base58 ed25519 keys and legacy transaction messages.
//!
//! # Example
//!
//! ```
//! use xchain_chain::address::AddressBuilder;
//! use xchain_chain::solana::SolanaAddressBuilder;
//!
//! let address = SolanaAddressBuilder
//!     .address_from_public_key(&[0u8; 32])
//!     .expect("32-byte key");
//! assert_eq!(address.as_str(), "11111111111111111111111111111111");
//! ```

pub mod address;
pub mod builder;
pub mod tx;

pub use address::{
    associated_token_address, encode_pubkey, find_program_address, parse_pubkey, Pubkey,
    SolanaAddressBuilder, ASSOCIATED_TOKEN_PROGRAM_ID, MEMO_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
pub use builder::{system_transfer, token_transfer_checked, SolanaInput, SolanaTxBuilder};
pub use tx::{AccountMeta, Instruction, Message, SolanaTx};
