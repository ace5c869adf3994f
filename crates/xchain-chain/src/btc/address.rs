//! Bitcoin-family address derivation and decoding.
//!
//! The encoding step is pluggable through [`AddressCodec`]: the default
//! [`Base58Codec`] covers base58check and native segwit, and bitcoin cash
//! substitutes its CashAddr codec without touching anything else.

use std::fmt;
use std::sync::Arc;

use bitcoin::hashes::{hash160, Hash};
use bitcoin::{PubkeyHash, ScriptBuf, ScriptHash, WPubkeyHash, WScriptHash};
use xchain_core::config::ChainConfig;
use xchain_core::error::{AddressError, ConfigError};
use xchain_core::protocol::PublicKeyFormat;
use xchain_core::types::{Address, AddressType, PossibleAddress};

use super::params::ChainParams;
use crate::address::{extract_public_key, AddressBuilder};

/// Converts between public key hashes, address strings and output scripts.
pub trait AddressCodec: Send + Sync + fmt::Debug {
    /// Every address for `pubkey_hash`, preferred first.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Encoding`] if the parameters cannot be encoded.
    fn encode(
        &self,
        pubkey_hash: &[u8; 20],
        params: &ChainParams,
    ) -> Result<Vec<PossibleAddress>, AddressError>;

    /// The output script paying to `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidFormat`] if the address is not valid
    /// for the chain.
    fn decode(&self, address: &str, params: &ChainParams) -> Result<ScriptBuf, AddressError>;
}

/// Base58check pay-to-pubkey-hash plus native segwit v0 where enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base58Codec;

impl Base58Codec {
    fn base58(version: u8, hash: &[u8; 20]) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(hash);
        bs58::encode(payload).with_check().into_string()
    }

    fn decode_segwit(address: &str, hrp: &str) -> Result<ScriptBuf, AddressError> {
        let (decoded_hrp, version, program) = bech32::segwit::decode(address)
            .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
        if decoded_hrp.as_str() != hrp {
            return Err(AddressError::invalid_format(
                address,
                format!("expected prefix {hrp}, got {}", decoded_hrp.as_str()),
            ));
        }
        if version.to_u8() != 0 {
            return Err(AddressError::invalid_format(
                address,
                format!("unsupported witness version {}", version.to_u8()),
            ));
        }
        match program.len() {
            20 => {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(&program);
                Ok(ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array(hash)))
            }
            32 => {
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&program);
                Ok(ScriptBuf::new_p2wsh(&WScriptHash::from_byte_array(hash)))
            }
            n => Err(AddressError::invalid_format(
                address,
                format!("invalid witness program length {n}"),
            )),
        }
    }
}

impl AddressCodec for Base58Codec {
    fn encode(
        &self,
        pubkey_hash: &[u8; 20],
        params: &ChainParams,
    ) -> Result<Vec<PossibleAddress>, AddressError> {
        let legacy = Address::new(Self::base58(params.pubkey_hash_prefix, pubkey_hash));
        let Some(hrp) = &params.segwit_hrp else {
            return Ok(vec![PossibleAddress::new(legacy, AddressType::Default)]);
        };

        let hrp = bech32::Hrp::parse(hrp)
            .map_err(|e| AddressError::encoding(format!("invalid segwit prefix {hrp}: {e}")))?;
        let segwit = bech32::segwit::encode_v0(hrp, pubkey_hash)
            .map_err(|e| AddressError::encoding(e.to_string()))?;
        Ok(vec![
            PossibleAddress::new(Address::new(segwit), AddressType::SegWit),
            PossibleAddress::new(legacy, AddressType::Legacy),
        ])
    }

    fn decode(&self, address: &str, params: &ChainParams) -> Result<ScriptBuf, AddressError> {
        if let Some(hrp) = &params.segwit_hrp {
            if address.to_ascii_lowercase().starts_with(&format!("{hrp}1")) {
                return Self::decode_segwit(address, hrp);
            }
        }

        let payload = bs58::decode(address)
            .with_check(None)
            .into_vec()
            .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
        let [version, hash @ ..] = payload.as_slice() else {
            return Err(AddressError::invalid_format(address, "empty payload"));
        };
        let hash: [u8; 20] = hash.try_into().map_err(|_| {
            AddressError::invalid_format(address, format!("expected 21 bytes, got {}", payload.len()))
        })?;

        if *version == params.pubkey_hash_prefix {
            Ok(ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(hash)))
        } else if *version == params.script_hash_prefix {
            Ok(ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(hash)))
        } else {
            Err(AddressError::invalid_format(
                address,
                format!("unexpected version byte 0x{version:02x}"),
            ))
        }
    }
}

/// HASH160 of the compressed form of `public_key`.
///
/// # Errors
///
/// Returns [`AddressError::InvalidPublicKey`] if the key is not a
/// secp256k1 point.
pub fn pubkey_hash(public_key: &[u8]) -> Result<[u8; 20], AddressError> {
    let compressed = extract_public_key(PublicKeyFormat::Compressed, public_key)?;
    Ok(hash160::Hash::hash(&compressed).to_byte_array())
}

/// Address builder for btc and btc-legacy chains.
#[derive(Debug, Clone)]
pub struct BtcAddressBuilder {
    params: ChainParams,
    codec: Arc<dyn AddressCodec>,
}

impl BtcAddressBuilder {
    /// Builder for `config` using [`Base58Codec`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain is not a
    /// bitcoin-family chain.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            params: ChainParams::from_config(config)?,
            codec: Arc::new(Base58Codec),
        })
    }

    /// Replace the address codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn AddressCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Chain parameters.
    #[must_use]
    pub const fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Output script paying to `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidFormat`] if the address is not valid
    /// for the chain.
    pub fn decode(&self, address: &str) -> Result<ScriptBuf, AddressError> {
        self.codec.decode(address, &self.params)
    }
}

impl AddressBuilder for BtcAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        self.all_possible_addresses_from_public_key(public_key)?
            .into_iter()
            .next()
            .map(|possible| possible.address)
            .ok_or_else(|| AddressError::encoding("codec produced no address"))
    }

    fn all_possible_addresses_from_public_key(
        &self,
        public_key: &[u8],
    ) -> Result<Vec<PossibleAddress>, AddressError> {
        let hash = pubkey_hash(public_key)?;
        let addresses = self.codec.encode(&hash, &self.params)?;
        for possible in &addresses {
            self.decode(possible.address.as_str())?;
        }
        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use xchain_core::asset::NativeAsset;

    // Private key 1: G = 0279be667e...
    const GENERATOR: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn generator() -> Vec<u8> {
        hex::decode(GENERATOR).unwrap()
    }

    #[test]
    fn test_btc_addresses_for_generator() {
        let builder = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Btc)).unwrap();
        let all = builder.all_possible_addresses_from_public_key(&generator()).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].address_type, AddressType::SegWit);
        assert_eq!(all[0].address.as_str(), "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        assert_eq!(all[1].address_type, AddressType::Legacy);
        assert_eq!(all[1].address.as_str(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");

        assert_eq!(
            builder.address_from_public_key(&generator()).unwrap(),
            all[0].address
        );
    }

    #[test]
    fn test_doge_single_default_address() {
        let builder = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Doge)).unwrap();
        let all = builder.all_possible_addresses_from_public_key(&generator()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].address_type, AddressType::Default);
        assert!(all[0].address.as_str().starts_with('D'));
    }

    #[test]
    fn test_decode_scripts() {
        let builder = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Btc)).unwrap();
        assert!(builder
            .decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH")
            .unwrap()
            .is_p2pkh());
        assert!(builder
            .decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4")
            .unwrap()
            .is_p2wpkh());
        assert!(builder
            .decode("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy")
            .unwrap()
            .is_p2sh());
    }

    #[test]
    fn test_decode_rejects_foreign_addresses() {
        let builder = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Doge)).unwrap();
        assert!(matches!(
            builder.decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"),
            Err(AddressError::InvalidFormat { .. })
        ));
        assert!(builder.decode("not-an-address").is_err());
    }

    #[test]
    fn test_invalid_public_key() {
        let builder = BtcAddressBuilder::new(&ChainConfig::new(NativeAsset::Btc)).unwrap();
        assert!(matches!(
            builder.address_from_public_key(&[0u8; 10]),
            Err(AddressError::InvalidPublicKey { .. })
        ));
    }
}
