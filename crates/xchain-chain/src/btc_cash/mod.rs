//! Bitcoin cash: the btc implementation with CashAddr encoding.
//!
//! Each type here owns the corresponding btc type, configured with
//! [`CashAddrCodec`], and delegates to it. Sighashes pick up the BCH fork id
//! from [`ChainParams`](crate::btc::ChainParams).
//!
//! # Example
//!
//! ```
//! use xchain_chain::address::AddressBuilder;
//! use xchain_chain::btc::BtcAddressBuilder;
//! use xchain_chain::btc_cash::BchAddressBuilder;
//! use xchain_core::{ChainConfig, NativeAsset};
//!
//! let key = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
//!     .expect("hex");
//!
//! let btc = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Btc)).expect("btc");
//! let bch = BchAddressBuilder::new(&ChainConfig::new(NativeAsset::Bch)).expect("bch");
//!
//! let bch_address = bch.address_from_public_key(&key).expect("valid key");
//! assert!(bch_address.as_str().starts_with("bitcoincash:q"));
//! assert_ne!(btc.address_from_public_key(&key).expect("valid key"), bch_address);
//! ```

pub mod cashaddr;

use std::sync::Arc;

use bitcoin::ScriptBuf;
use xchain_core::config::ChainConfig;
use xchain_core::error::{AddressError, BuildError, ConfigError};
use xchain_core::protocol::Protocol;
use xchain_core::types::{Address, PossibleAddress, TransferArgs};

use crate::address::AddressBuilder;
use crate::btc::{BtcAddressBuilder, BtcClient, BtcTxBuilder};
use crate::builder::{Tx, TxBuilder};
use crate::client::Client;
use crate::input::TxInput;

pub use cashaddr::CashAddrCodec;

/// Address builder for bitcoin cash.
#[derive(Debug, Clone)]
pub struct BchAddressBuilder {
    inner: BtcAddressBuilder,
}

impl BchAddressBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain is not a
    /// bitcoin-family chain.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: BtcAddressBuilder::new(config)?.with_codec(Arc::new(CashAddrCodec)),
        })
    }
}

impl AddressBuilder for BchAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        self.inner.address_from_public_key(public_key)
    }

    fn all_possible_addresses_from_public_key(
        &self,
        public_key: &[u8],
    ) -> Result<Vec<PossibleAddress>, AddressError> {
        self.inner.all_possible_addresses_from_public_key(public_key)
    }
}

/// Transaction builder for bitcoin cash.
#[derive(Debug, Clone)]
pub struct BchTxBuilder {
    inner: BtcTxBuilder,
}

impl BchTxBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain is not a
    /// bitcoin-family chain.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: BtcTxBuilder::new(config)?.with_codec(Arc::new(CashAddrCodec)),
        })
    }
}

impl TxBuilder for BchTxBuilder {
    fn new_transfer(&self, args: &TransferArgs, input: &TxInput) -> Result<Box<dyn Tx>, BuildError> {
        self.inner.new_transfer(args, input)
    }

    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        self.inner.new_native_transfer(args, input)
    }

    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        self.inner.new_token_transfer(args, input)
    }

    fn new_task(&self, args: &TransferArgs, input: &TxInput) -> Result<Box<dyn Tx>, BuildError> {
        self.inner.new_task(args, input)
    }
}

/// Client for bitcoin cash.
#[derive(Debug, Clone)]
pub struct BchClient {
    inner: BtcClient,
}

impl BchClient {
    /// Client for `config`.
    ///
    /// # Errors
    ///
    /// Same as [`BtcClient::new`].
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: BtcClient::new(config)?.with_codec(Arc::new(CashAddrCodec)),
        })
    }

    /// Output script of a CashAddr or legacy address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidFormat`] if the address is invalid.
    pub fn decode_address(&self, address: &str) -> Result<ScriptBuf, AddressError> {
        self.inner.decode_address(address)
    }
}

impl Client for BchClient {
    fn protocol(&self) -> &Protocol {
        self.inner.protocol()
    }

    fn provider(&self) -> &str {
        self.inner.provider()
    }

    fn endpoint(&self) -> Option<&str> {
        self.inner.endpoint()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::btc::{BtcInput, Utxo};
    use crate::input::ChainInput;
    use alloy_primitives::U256;
    use xchain_core::asset::NativeAsset;
    use xchain_core::config::ClientConfig;
    use xchain_core::types::TxSignature;
    use xchain_crypto::{KeyPair, Secp256k1KeyPair};

    #[test]
    fn test_client_decodes_cashaddr() {
        let config = ChainConfig::new(NativeAsset::Bch)
            .with_chain_prefix("bitcoincash")
            .with_client(ClientConfig {
                auth: "1234".to_string(),
                ..ClientConfig::default()
            });
        let client = BchClient::new(&config).unwrap();
        assert_eq!(client.protocol(), &Protocol::BTC_CASH);
        assert!(client
            .decode_address("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a")
            .is_ok());
    }

    #[test]
    fn test_transfer_between_cash_addresses_uses_forkid() {
        let config = ChainConfig::new(NativeAsset::Bch).with_chain_prefix("bitcoincash");
        let pair = Secp256k1KeyPair::from_bytes([9u8; 32]).unwrap();
        let from = BchAddressBuilder::new(&config)
            .unwrap()
            .address_from_public_key(pair.public_key().compressed())
            .unwrap();

        let builder = BchTxBuilder::new(&config).unwrap();
        let input = TxInput::new(ChainInput::Btc(BtcInput {
            utxos: vec![Utxo::new(
                "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16",
                0,
                100_000,
            )],
            fee_rate: 2,
            from_public_key: hex::encode(pair.public_key().compressed()),
        }));
        let args = TransferArgs::new(
            from.clone(),
            Address::new("bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a"),
            U256::from(10_000u64),
        );

        let mut tx = builder.new_transfer(&args, &input).unwrap();
        let sighashes = tx.sighashes().unwrap();
        assert_eq!(sighashes.len(), 1);

        let sig = pair.sign(sighashes[0].as_bytes()).unwrap();
        tx.add_signatures(&[TxSignature::new(sig.to_recoverable_bytes().to_vec())])
            .unwrap();

        let bytes = tx.serialize().unwrap();
        let decoded: bitcoin::Transaction = bitcoin::consensus::encode::deserialize(&bytes).unwrap();
        let script_sig = decoded.input[0].script_sig.as_bytes();
        // push opcode, DER signature, then the hash type byte
        let sig_len = usize::from(script_sig[0]);
        assert_eq!(script_sig[sig_len], 0x41);
    }
}
