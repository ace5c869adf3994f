//! Bech32 account addresses of cosmos SDK chains.

use bech32::{Bech32, Hrp};
use bitcoin::hashes::{hash160, Hash};
use sha3::{Digest, Keccak256};
use xchain_core::config::ChainConfig;
use xchain_core::error::{AddressError, ConfigError};
use xchain_core::protocol::{Protocol, PublicKeyFormat};
use xchain_core::types::Address;

use crate::address::{extract_public_key, AddressBuilder};

/// How the account hash is derived from the public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHashing {
    /// RIPEMD160(SHA256(compressed key)).
    Hash160,
    /// Last 20 bytes of KECCAK256 of the uncompressed key, as on Ethereum.
    Keccak,
}

impl KeyHashing {
    /// The hashing used by `protocol`.
    #[must_use]
    pub fn for_protocol(protocol: &Protocol) -> Self {
        if *protocol == Protocol::EVMOS {
            Self::Keccak
        } else {
            Self::Hash160
        }
    }

    /// 20-byte account hash of `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidPublicKey`] if the key is malformed.
    pub fn account_hash(self, public_key: &[u8]) -> Result<[u8; 20], AddressError> {
        match self {
            Self::Hash160 => {
                let compressed = extract_public_key(PublicKeyFormat::Compressed, public_key)?;
                Ok(hash160::Hash::hash(&compressed).to_byte_array())
            }
            Self::Keccak => {
                let uncompressed = extract_public_key(PublicKeyFormat::Uncompressed, public_key)?;
                let digest = Keccak256::digest(&uncompressed[1..]);
                let mut out = [0u8; 20];
                out.copy_from_slice(&digest[12..]);
                Ok(out)
            }
        }
    }
}

/// Decode a bech32 account address and check its prefix.
///
/// # Errors
///
/// Returns [`AddressError::InvalidFormat`] on a bad checksum, a foreign
/// prefix, or a payload that is neither 20 nor 32 bytes.
pub fn decode_address(address: &str, prefix: &str) -> Result<Vec<u8>, AddressError> {
    let (hrp, data) = bech32::decode(address)
        .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
    if hrp.as_str() != prefix {
        return Err(AddressError::invalid_format(
            address,
            format!("expected prefix {prefix}, got {}", hrp.as_str()),
        ));
    }
    if data.len() != 20 && data.len() != 32 {
        return Err(AddressError::invalid_format(
            address,
            format!("unexpected payload length {}", data.len()),
        ));
    }
    Ok(data)
}

/// Address builder for cosmos and evmos chains.
#[derive(Debug, Clone)]
pub struct CosmosAddressBuilder {
    prefix: String,
    hashing: KeyHashing,
}

impl CosmosAddressBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain has no usable
    /// bech32 prefix.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        if Hrp::parse(&config.chain_prefix).is_err() {
            return Err(ConfigError::invalid_value(
                "chain_prefix",
                format!("{} requires a bech32 prefix", config.id()),
            ));
        }
        Ok(Self {
            prefix: config.chain_prefix.clone(),
            hashing: KeyHashing::for_protocol(&config.protocol),
        })
    }

    /// The bech32 prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl AddressBuilder for CosmosAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        let hash = self.hashing.account_hash(public_key)?;
        let hrp = Hrp::parse(&self.prefix).map_err(|e| AddressError::encoding(e.to_string()))?;
        let encoded = bech32::encode::<Bech32>(hrp, &hash)
            .map_err(|e| AddressError::encoding(e.to_string()))?;
        decode_address(&encoded, &self.prefix)?;
        Ok(Address::new(encoded))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use xchain_core::asset::NativeAsset;

    const GENERATOR: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn atom() -> ChainConfig {
        ChainConfig::new(NativeAsset::Atom).with_chain_prefix("cosmos")
    }

    #[test]
    fn test_cosmos_address_is_bech32_of_hash160() {
        let builder = CosmosAddressBuilder::new(&atom()).unwrap();
        let key = hex::decode(GENERATOR).unwrap();
        let address = builder.address_from_public_key(&key).unwrap();
        assert!(address.as_str().starts_with("cosmos1"));

        let payload = decode_address(address.as_str(), "cosmos").unwrap();
        assert_eq!(hex::encode(payload), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn test_evmos_address_uses_keccak() {
        let config = ChainConfig::new(NativeAsset::Evmos).with_chain_prefix("evmos");
        let builder = CosmosAddressBuilder::new(&config).unwrap();
        let key = hex::decode(GENERATOR).unwrap();
        let address = builder.address_from_public_key(&key).unwrap();

        let payload = decode_address(address.as_str(), "evmos").unwrap();
        // Ethereum address of private key 1.
        assert_eq!(hex::encode(payload), "7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_single_default_address() {
        let builder = CosmosAddressBuilder::new(&atom()).unwrap();
        let key = hex::decode(GENERATOR).unwrap();
        let all = builder.all_possible_addresses_from_public_key(&key).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].address_type, xchain_core::AddressType::Default);
    }

    #[test]
    fn test_missing_prefix_is_config_error() {
        assert!(CosmosAddressBuilder::new(&ChainConfig::new(NativeAsset::Atom)).is_err());
    }

    #[test]
    fn test_decode_rejects_foreign_prefix() {
        let builder = CosmosAddressBuilder::new(&atom()).unwrap();
        let key = hex::decode(GENERATOR).unwrap();
        let address = builder.address_from_public_key(&key).unwrap();
        assert!(decode_address(address.as_str(), "osmo").is_err());
    }
}
