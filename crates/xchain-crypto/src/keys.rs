//! Secret key material with secure memory handling.
//!
//! Key material held by this module is:
//! - Zeroized on drop
//! - Never exposed in debug output
//! - Compared in constant time
//!
//! Secrets arrive as text from the custody platform. [`SecretKey::from_hex`]
//! accepts a 32-byte hex scalar (with or without `0x`); ed25519 keys may also
//! come as a base58 64-byte keypair, see [`decode_ed25519_secret`].

use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use xchain_core::error::SignError;

/// The length of a secret key in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Length of an ed25519 keypair (secret followed by public key).
pub const KEYPAIR_LEN: usize = 64;

/// A 32-byte secret key with automatic zeroization.
///
/// This type does not implement `Clone`; keys are moved, not copied.
///
/// # Example
///
/// ```
/// use xchain_crypto::keys::SecretKey;
///
/// let key = SecretKey::from_hex(
///     "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
/// ).expect("valid hex");
/// assert_eq!(key.len(), 32);
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_LEN],
}

impl SecretKey {
    /// Create a `SecretKey` from raw bytes.
    ///
    /// The caller should zeroize its own copy afterwards.
    #[must_use]
    pub const fn new(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a random `SecretKey` from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Copy a 32-byte slice into a `SecretKey`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if `bytes` is not 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignError> {
        let array: [u8; SECRET_KEY_LEN] = bytes.try_into().map_err(|_| SignError::InvalidKey)?;
        Ok(Self::new(array))
    }

    /// Decode a hex secret, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the text is not 32 bytes of hex.
    pub fn from_hex(secret: &str) -> Result<Self, SignError> {
        let decoded = decode_hex(secret)?;
        Self::from_slice(&decoded)
    }

    /// Expose the raw bytes for a cryptographic operation.
    ///
    /// The returned reference must not be stored beyond that operation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.bytes
    }

    /// Always 32.
    #[must_use]
    pub const fn len(&self) -> usize {
        SECRET_KEY_LEN
    }

    /// Always `false`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Convert into a `k256::SecretKey`, consuming `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are zero or not below
    /// the curve order.
    pub fn into_k256(self) -> Result<k256::SecretKey, SignError> {
        k256::SecretKey::from_bytes((&self.bytes).into()).map_err(|_| SignError::InvalidKey)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl Eq for SecretKey {}

impl From<[u8; SECRET_KEY_LEN]> for SecretKey {
    fn from(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self::new(bytes)
    }
}

// ============================================================================
// Text decoding
// ============================================================================

fn decode_hex(secret: &str) -> Result<Zeroizing<Vec<u8>>, SignError> {
    let trimmed = secret.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits)
        .map(Zeroizing::new)
        .map_err(|_| SignError::InvalidKey)
}

/// Decode an ed25519 secret.
///
/// Accepted forms, tried in order:
/// - 32-byte hex seed
/// - 64-byte hex keypair (seed followed by public key)
/// - base58 64-byte keypair, as exported by Solana wallets
///
/// Returns the 32-byte seed and, for keypair forms, the embedded public key
/// so the caller can check it.
///
/// # Errors
///
/// Returns [`SignError::InvalidKey`] if none of the forms match.
pub fn decode_ed25519_secret(secret: &str) -> Result<(SecretKey, Option<[u8; 32]>), SignError> {
    let bytes = match decode_hex(secret) {
        Ok(bytes) => bytes,
        Err(_) => bs58::decode(secret.trim())
            .into_vec()
            .map(Zeroizing::new)
            .map_err(|_| SignError::InvalidKey)?,
    };

    match bytes.len() {
        SECRET_KEY_LEN => Ok((SecretKey::from_slice(&bytes)?, None)),
        KEYPAIR_LEN => {
            let (seed, public) = bytes.split_at(SECRET_KEY_LEN);
            let public: [u8; 32] = public.try_into().map_err(|_| SignError::InvalidKey)?;
            Ok((SecretKey::from_slice(seed)?, Some(public)))
        }
        _ => Err(SignError::InvalidKey),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    const HEX_KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_new_creates_key_with_correct_bytes() {
        let bytes = [0x42u8; SECRET_KEY_LEN];
        let key = SecretKey::new(bytes);
        assert_eq!(key.as_bytes(), &bytes);
        assert_eq!(key.len(), 32);
        assert!(!key.is_empty());
    }

    #[test]
    fn test_generate_produces_unique_keys() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_from_hex_with_and_without_prefix() {
        let plain = SecretKey::from_hex(HEX_KEY).unwrap();
        let prefixed = SecretKey::from_hex(&format!("0x{HEX_KEY}")).unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.as_bytes()[0], 0x4c);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length_and_garbage() {
        assert_eq!(SecretKey::from_hex("abcd").unwrap_err(), SignError::InvalidKey);
        assert_eq!(SecretKey::from_hex("zz").unwrap_err(), SignError::InvalidKey);
    }

    #[test]
    fn test_debug_does_not_expose_key_material() {
        let key = SecretKey::new([0xABu8; SECRET_KEY_LEN]);
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, "SecretKey([REDACTED])");
        assert!(!debug_output.contains("ab"));
    }

    #[test]
    fn test_partial_eq_single_bit_difference() {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        let key1 = SecretKey::new(bytes);
        bytes[0] = 0x01;
        let key2 = SecretKey::new(bytes);
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_into_k256_invalid_zero_key() {
        let key = SecretKey::new([0u8; SECRET_KEY_LEN]);
        assert_eq!(key.into_k256().unwrap_err(), SignError::InvalidKey);
    }

    #[test]
    fn test_decode_ed25519_hex_seed() {
        let (seed, public) = decode_ed25519_secret(HEX_KEY).unwrap();
        assert_eq!(seed.as_bytes()[0], 0x4c);
        assert!(public.is_none());
    }

    #[test]
    fn test_decode_ed25519_base58_keypair() {
        let mut keypair = [0x11u8; KEYPAIR_LEN];
        keypair[40] = 0x22;
        let encoded = bs58::encode(keypair).into_string();

        let (seed, public) = decode_ed25519_secret(&encoded).unwrap();
        assert_eq!(seed.as_bytes(), &[0x11u8; 32]);
        assert_eq!(public.unwrap()[8], 0x22);
    }

    #[test]
    fn test_decode_ed25519_rejects_other_lengths() {
        let encoded = bs58::encode([1u8; 48]).into_string();
        assert_eq!(
            decode_ed25519_secret(&encoded).unwrap_err(),
            SignError::InvalidKey
        );
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SecretKey>();
    }
}
