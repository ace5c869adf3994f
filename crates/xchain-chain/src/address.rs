//! The address derivation contract.
//!
//! An [`AddressBuilder`] derives the address(es) controlled by a public key.
//! Public keys arrive in whatever encoding the signer produced;
//! [`extract_public_key`] normalises them to the encoding a protocol's
//! derivation expects (see [`Protocol::public_key_format`]).
//!
//! [`Protocol::public_key_format`]: xchain_core::Protocol::public_key_format
//!
//! # Example
//!
//! ```rust
//! use xchain_chain::address::extract_public_key;
//! use xchain_core::PublicKeyFormat;
//! use xchain_crypto::{KeyPair, Secp256k1KeyPair};
//!
//! let pair = Secp256k1KeyPair::from_bytes([7u8; 32]).expect("valid key");
//! let compressed = pair.public_key().compressed();
//!
//! let uncompressed = extract_public_key(PublicKeyFormat::Uncompressed, compressed)
//!     .expect("valid key");
//! assert_eq!(uncompressed.as_slice(), pair.public_key().uncompressed());
//! ```

use std::fmt;

use xchain_core::error::AddressError;
use xchain_core::protocol::PublicKeyFormat;
use xchain_core::types::{Address, AddressType, PossibleAddress};
use xchain_crypto::Secp256k1PublicKey;

/// Derives addresses from public keys.
///
/// Implementations hold only immutable configuration and are shared across
/// threads.
pub trait AddressBuilder: Send + Sync + fmt::Debug {
    /// The preferred address for `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidPublicKey`] if the key has the wrong
    /// length or is not a curve point, or [`AddressError::Encoding`] if the
    /// chain encoding fails.
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError>;

    /// Every valid address for `public_key`, preferred first.
    ///
    /// Chains with a single representation return one
    /// [`AddressType::Default`] entry.
    ///
    /// # Errors
    ///
    /// Same as [`address_from_public_key`](Self::address_from_public_key).
    fn all_possible_addresses_from_public_key(
        &self,
        public_key: &[u8],
    ) -> Result<Vec<PossibleAddress>, AddressError> {
        let address = self.address_from_public_key(public_key)?;
        Ok(vec![PossibleAddress::new(address, AddressType::Default)])
    }
}

/// Re-encode `public_key` in `format`.
///
/// secp256k1 keys are accepted as 33-byte compressed, 65-byte uncompressed
/// or 64-byte untagged `x || y`; raw keys must be 32 bytes.
///
/// # Errors
///
/// Returns [`AddressError::InvalidPublicKey`] if the key cannot be brought
/// into `format`.
pub fn extract_public_key(
    format: PublicKeyFormat,
    public_key: &[u8],
) -> Result<Vec<u8>, AddressError> {
    match format {
        PublicKeyFormat::Raw => {
            if public_key.len() == 32 {
                Ok(public_key.to_vec())
            } else {
                Err(AddressError::invalid_public_key(format!(
                    "expected 32 raw bytes, got {}",
                    public_key.len()
                )))
            }
        }
        PublicKeyFormat::Compressed => Ok(secp256k1_key(public_key)?.compressed().to_vec()),
        PublicKeyFormat::Uncompressed => Ok(secp256k1_key(public_key)?.uncompressed().to_vec()),
    }
}

fn secp256k1_key(public_key: &[u8]) -> Result<Secp256k1PublicKey, AddressError> {
    let parsed = if public_key.len() == 64 {
        let mut tagged = Vec::with_capacity(65);
        tagged.push(0x04);
        tagged.extend_from_slice(public_key);
        Secp256k1PublicKey::from_sec1(&tagged)
    } else {
        Secp256k1PublicKey::from_sec1(public_key)
    };
    parsed.map_err(|_| {
        AddressError::invalid_public_key(format!(
            "not a secp256k1 public key ({} bytes)",
            public_key.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use xchain_crypto::{KeyPair, Secp256k1KeyPair};

    #[test]
    fn test_extract_round_trips_between_encodings() {
        let pair = Secp256k1KeyPair::from_bytes([1u8; 32]).unwrap();
        let pk = pair.public_key();

        let from_uncompressed = extract_public_key(PublicKeyFormat::Compressed, pk.uncompressed());
        assert_eq!(from_uncompressed.unwrap(), pk.compressed().to_vec());

        let from_raw = extract_public_key(PublicKeyFormat::Compressed, pk.raw());
        assert_eq!(from_raw.unwrap(), pk.compressed().to_vec());
    }

    #[test]
    fn test_extract_raw_requires_32_bytes() {
        assert_eq!(extract_public_key(PublicKeyFormat::Raw, &[1u8; 32]).unwrap().len(), 32);
        assert!(matches!(
            extract_public_key(PublicKeyFormat::Raw, &[1u8; 33]),
            Err(AddressError::InvalidPublicKey { .. })
        ));
    }

    #[test]
    fn test_extract_rejects_malformed_keys() {
        let mut bogus = [0u8; 33];
        bogus[0] = 0x05;
        assert!(matches!(
            extract_public_key(PublicKeyFormat::Uncompressed, &bogus),
            Err(AddressError::InvalidPublicKey { .. })
        ));
        assert!(matches!(
            extract_public_key(PublicKeyFormat::Compressed, &[2u8; 20]),
            Err(AddressError::InvalidPublicKey { .. })
        ));
    }
}
