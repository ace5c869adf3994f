//! Tron: keccak-derived base58check addresses and protobuf transactions.
//!
//! # Example
//!
//! ```
//! use xchain_chain::address::AddressBuilder;
//! use xchain_chain::tron::TronAddressBuilder;
//!
//! let key = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
//!     .expect("hex");
//! let address = TronAddressBuilder.address_from_public_key(&key).expect("valid key");
//! assert_eq!(address.as_str(), "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");
//! ```

pub mod address;
pub mod builder;
pub mod proto;
pub mod tx;

pub use address::{decode_address, encode_account, TronAddressBuilder, ADDRESS_PREFIX};
pub use builder::{TronInput, TronTxBuilder};
pub use tx::TronTx;
