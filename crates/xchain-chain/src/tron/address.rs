//! Tron addresses: base58check of `0x41 || keccak tail`.

use xchain_core::config::ChainConfig;
use xchain_core::error::AddressError;
use xchain_core::types::Address;

use crate::address::AddressBuilder;
use crate::evm::account_from_public_key;

/// Mainnet address prefix byte.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Encode a 20-byte account.
#[must_use]
pub fn encode_account(account: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(ADDRESS_PREFIX);
    payload.extend_from_slice(account);
    bs58::encode(payload).with_check().into_string()
}

/// Decode an address into its 21-byte wire form (prefix included).
///
/// # Errors
///
/// Returns [`AddressError::InvalidFormat`] on a bad checksum, length or
/// prefix.
pub fn decode_address(address: &str) -> Result<[u8; 21], AddressError> {
    let bytes = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
    let wire: [u8; 21] = bytes.try_into().map_err(|bytes: Vec<u8>| {
        AddressError::invalid_format(address, format!("expected 21 bytes, got {}", bytes.len()))
    })?;
    if wire[0] != ADDRESS_PREFIX {
        return Err(AddressError::invalid_format(
            address,
            format!("unexpected prefix {:#04x}", wire[0]),
        ));
    }
    Ok(wire)
}

/// Address builder for tron.
#[derive(Debug, Clone, Copy, Default)]
pub struct TronAddressBuilder;

impl TronAddressBuilder {
    /// Builder for `config`.
    #[must_use]
    pub const fn new(_config: &ChainConfig) -> Self {
        Self
    }
}

impl AddressBuilder for TronAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        let account: [u8; 20] = account_from_public_key(public_key)?.into();
        Ok(Address::new(encode_account(&account)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_address_from_key() {
        let key = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap();
        let address = TronAddressBuilder.address_from_public_key(&key).unwrap();
        assert_eq!(address.as_str(), "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");

        let wire = decode_address(address.as_str()).unwrap();
        assert_eq!(hex::encode(wire), "417e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        assert!(decode_address("TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HD").is_err());
        assert!(decode_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").is_err());
    }
}
