//! EIP-55 checksummed addresses.

use std::str::FromStr;

use alloy_primitives::{keccak256, Address as EvmAddress};
use xchain_core::config::ChainConfig;
use xchain_core::error::AddressError;
use xchain_core::protocol::PublicKeyFormat;
use xchain_core::types::Address;

use crate::address::{extract_public_key, AddressBuilder};

/// The 20-byte account of a secp256k1 public key: the last 20 bytes of the
/// KECCAK-256 of the untagged uncompressed point.
///
/// # Errors
///
/// Returns [`AddressError::InvalidPublicKey`] if the key is not a secp256k1
/// point.
pub fn account_from_public_key(public_key: &[u8]) -> Result<EvmAddress, AddressError> {
    let uncompressed = extract_public_key(PublicKeyFormat::Uncompressed, public_key)?;
    let point = uncompressed
        .get(1..)
        .ok_or_else(|| AddressError::invalid_public_key("empty public key"))?;
    Ok(EvmAddress::from_word(keccak256(point)))
}

/// Parse a `0x` address, enforcing the checksum when the input is mixed case.
///
/// # Errors
///
/// Returns [`AddressError::InvalidFormat`] on bad hex, length or checksum.
pub fn parse_address(address: &str) -> Result<EvmAddress, AddressError> {
    let parsed = EvmAddress::from_str(address)
        .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
    let body = address.trim_start_matches("0x");
    let mixed_case = body.chars().any(|c| c.is_ascii_uppercase())
        && body.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case && parsed.to_checksum(None).trim_start_matches("0x") != body {
        return Err(AddressError::invalid_format(address, "checksum mismatch"));
    }
    Ok(parsed)
}

/// Address builder for evm and evm-legacy chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvmAddressBuilder;

impl EvmAddressBuilder {
    /// Builder for `config`; EVM addresses do not depend on the chain.
    #[must_use]
    pub const fn new(_config: &ChainConfig) -> Self {
        Self
    }
}

impl AddressBuilder for EvmAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        Ok(Address::new(account_from_public_key(public_key)?.to_checksum(None)))
    }
}
