//! Curve key pairs.
//!
//! [`KeyPair`] abstracts over the curves used by the supported protocols:
//!
//! - [`Secp256k1KeyPair`] - ECDSA for the Bitcoin, Cosmos, EVM and Tron families
//! - [`Ed25519KeyPair`] - `EdDSA` for Solana and TON
//! - [`SchnorrKeyPair`] - BIP-340 Schnorr over secp256k1
//!
//! # Example
//!
//! ```rust
//! use xchain_crypto::keypair::{KeyPair, Secp256k1KeyPair};
//!
//! let keypair = Secp256k1KeyPair::generate();
//! assert_eq!(keypair.public_key().compressed().len(), 33);
//!
//! let digest = [0x42u8; 32];
//! let signature = keypair.sign(&digest).expect("signing failed");
//! assert_eq!(signature.to_recoverable_bytes().len(), 65);
//! ```

use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use rand::RngCore;

use crate::keys::SecretKey;
use xchain_core::error::SignError;

// ============================================================================
// KeyPair Trait
// ============================================================================

/// A curve key pair.
///
/// Implementations must be `Send + Sync` so a signer can be shared across
/// threads.
pub trait KeyPair: Send + Sync {
    /// The signature type produced by this key pair.
    type Signature: AsRef<[u8]>;

    /// The public key type for this key pair.
    type PublicKey: AsRef<[u8]>;

    /// Generate a new random key pair.
    fn generate() -> Self
    where
        Self: Sized;

    /// Create a key pair from raw secret key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the bytes are not a valid secret
    /// for this curve.
    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError>
    where
        Self: Sized;

    /// Get the public key.
    fn public_key(&self) -> &Self::PublicKey;

    /// Sign a message.
    ///
    /// ECDSA and Schnorr pairs expect a 32-byte digest; ed25519 signs the
    /// message itself.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidPayload`] if the message does not fit the
    /// curve, or [`SignError::SignatureFailed`] if signing fails.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError>;
}

fn digest_array(message: &[u8]) -> Result<&[u8; 32], SignError> {
    message.try_into().map_err(|_| {
        SignError::invalid_payload(format!("expected a 32-byte digest, got {} bytes", message.len()))
    })
}

// ============================================================================
// Secp256k1 Public Key
// ============================================================================

/// A secp256k1 public key in both SEC1 encodings.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    compressed: [u8; 33],
    uncompressed: [u8; 65],
}

impl Secp256k1PublicKey {
    fn from_verifying_key(verifying: &VerifyingKey) -> Self {
        let mut uncompressed = [0u8; 65];
        uncompressed.copy_from_slice(verifying.to_encoded_point(false).as_bytes());

        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(verifying.to_encoded_point(true).as_bytes());

        Self {
            compressed,
            uncompressed,
        }
    }

    /// Parse a 33-byte compressed or 65-byte uncompressed SEC1 key.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidCounterpartyKey`] if the bytes are not a
    /// point on the curve.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, SignError> {
        let verifying = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| {
            SignError::invalid_counterparty_key(format!(
                "not a secp256k1 SEC1 key ({} bytes)",
                bytes.len()
            ))
        })?;
        Ok(Self::from_verifying_key(&verifying))
    }

    /// 33-byte compressed encoding.
    #[must_use]
    pub const fn compressed(&self) -> &[u8; 33] {
        &self.compressed
    }

    /// 65-byte uncompressed encoding (`0x04 || x || y`).
    #[must_use]
    pub const fn uncompressed(&self) -> &[u8; 65] {
        &self.uncompressed
    }

    /// 64-byte `x || y` without the SEC1 tag.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.uncompressed[1..]
    }

    fn to_k256(&self) -> Result<k256::PublicKey, SignError> {
        k256::PublicKey::from_sec1_bytes(&self.compressed)
            .map_err(|_| SignError::invalid_counterparty_key("not a curve point"))
    }
}

impl AsRef<[u8]> for Secp256k1PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.compressed
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1PublicKey({})", hex::encode(self.compressed))
    }
}

// ============================================================================
// Secp256k1 Signature
// ============================================================================

/// A low-s secp256k1 ECDSA signature with its recovery id.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1Signature {
    bytes: [u8; 64],
    recovery_id: u8,
}

impl Secp256k1Signature {
    /// Create from `r || s` and a recovery id.
    #[must_use]
    pub const fn from_bytes_and_recovery_id(bytes: [u8; 64], recovery_id: u8) -> Self {
        Self { bytes, recovery_id }
    }

    /// Recovery id (0 or 1).
    #[must_use]
    pub const fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// `r || s || v`, 65 bytes.
    #[must_use]
    pub fn to_recoverable_bytes(&self) -> [u8; 65] {
        let mut result = [0u8; 65];
        result[..64].copy_from_slice(&self.bytes);
        result[64] = self.recovery_id;
        result
    }

    /// DER encoding of `(r, s)`, as used in Bitcoin script signatures.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::SignatureFailed`] if the bytes are not a valid
    /// signature.
    pub fn to_der(&self) -> Result<Vec<u8>, SignError> {
        K256Signature::from_slice(&self.bytes)
            .map(|sig| sig.to_der().as_bytes().to_vec())
            .map_err(|_| SignError::signature_failed("malformed secp256k1 signature"))
    }
}

impl AsRef<[u8]> for Secp256k1Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (r, s) = self.bytes.split_at(32);
        write!(
            f,
            "Secp256k1Signature(r={}, s={}, v={})",
            hex::encode(r),
            hex::encode(s),
            self.recovery_id
        )
    }
}

// ============================================================================
// Secp256k1 Key Pair
// ============================================================================

/// secp256k1 ECDSA key pair.
#[allow(clippy::struct_field_names)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    public_key: Secp256k1PublicKey,
}

impl Secp256k1KeyPair {
    /// Create a key pair from a [`SecretKey`].
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the secret is not a valid scalar.
    pub fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Self::from_bytes(*secret.as_bytes())
    }

    /// Verify a signature over a 32-byte digest.
    #[must_use]
    pub fn verify(&self, digest: &[u8; 32], signature: &Secp256k1Signature) -> bool {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;

        let Ok(k256_sig) = K256Signature::from_slice(signature.as_ref()) else {
            return false;
        };

        self.verifying_key.verify_prehash(digest, &k256_sig).is_ok()
    }

    /// ECDH with `their_key`, returning the shared x-coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidCounterpartyKey`] if `their_key` is not a
    /// SEC1 secp256k1 key.
    pub fn shared_secret(&self, their_key: &[u8]) -> Result<[u8; 32], SignError> {
        let theirs = Secp256k1PublicKey::from_sec1(their_key)?.to_k256()?;
        let shared =
            k256::ecdh::diffie_hellman(self.signing_key.as_nonzero_scalar(), theirs.as_affine());
        let mut out = [0u8; 32];
        out.copy_from_slice(shared.raw_secret_bytes());
        Ok(out)
    }
}

impl KeyPair for Secp256k1KeyPair {
    type Signature = Secp256k1Signature;
    type PublicKey = Secp256k1PublicKey;

    fn generate() -> Self {
        loop {
            let secret = SecretKey::generate();
            if let Ok(pair) = Self::from_secret_key(&secret) {
                return pair;
            }
        }
    }

    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| SignError::InvalidKey)?;

        let verifying_key = *signing_key.verifying_key();
        let public_key = Secp256k1PublicKey::from_verifying_key(&verifying_key);

        Ok(Self {
            signing_key,
            verifying_key,
            public_key,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError> {
        let digest = digest_array(message)?;
        let (signature, recovery_id): (K256Signature, RecoveryId) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| SignError::signature_failed("secp256k1 signing failed"))?;

        // Flipping s to the lower half flips the parity of R.
        let normalized = signature.normalize_s();
        let sig_bytes = normalized.unwrap_or(signature).to_bytes();
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&sig_bytes);

        let recovery_id = if normalized.is_some() {
            recovery_id.to_byte() ^ 1
        } else {
            recovery_id.to_byte()
        };

        Ok(Secp256k1Signature { bytes, recovery_id })
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Ed25519
// ============================================================================

/// An ed25519 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    bytes: [u8; 32],
}

impl Ed25519PublicKey {
    /// Wrap raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({})", hex::encode(self.bytes))
    }
}

/// A 64-byte ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519Signature {
    bytes: [u8; 64],
}

impl Ed25519Signature {
    /// Wrap raw signature bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self { bytes }
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({})", hex::encode(self.bytes))
    }
}

/// ed25519 key pair.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
    public_key: Ed25519PublicKey,
}

impl Ed25519KeyPair {
    /// Create a key pair from a [`SecretKey`] seed.
    ///
    /// # Errors
    ///
    /// Never fails for a 32-byte seed; the `Result` matches [`KeyPair::from_bytes`].
    pub fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Self::from_bytes(*secret.as_bytes())
    }

    /// Create a key pair from a seed and check it against an expected public
    /// key, as carried by 64-byte keypair exports.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the derived public key differs.
    pub fn from_keypair(secret: &SecretKey, expected_public: &[u8; 32]) -> Result<Self, SignError> {
        let pair = Self::from_secret_key(secret)?;
        if pair.public_key.as_bytes() == expected_public {
            Ok(pair)
        } else {
            Err(SignError::InvalidKey)
        }
    }

    /// Verify a signature over `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        use ed25519_dalek::Verifier;

        let Ok(sig) = ed25519_dalek::Signature::from_slice(signature.as_ref()) else {
            return false;
        };

        self.signing_key.verifying_key().verify(message, &sig).is_ok()
    }
}

impl KeyPair for Ed25519KeyPair {
    type Signature = Ed25519Signature;
    type PublicKey = Ed25519PublicKey;

    fn generate() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
        let public_key = Ed25519PublicKey::from_bytes(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            public_key,
        }
    }

    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&bytes);
        let public_key = Ed25519PublicKey::from_bytes(signing_key.verifying_key().to_bytes());

        Ok(Self {
            signing_key,
            public_key,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError> {
        use ed25519_dalek::Signer;

        let signature = self.signing_key.sign(message);
        Ok(Ed25519Signature {
            bytes: signature.to_bytes(),
        })
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Schnorr
// ============================================================================

/// BIP-340 Schnorr key pair over secp256k1.
///
/// The public key is the 32-byte x-only encoding.
pub struct SchnorrKeyPair {
    signing_key: k256::schnorr::SigningKey,
    secret: k256::SecretKey,
    public_key: [u8; 32],
}

impl SchnorrKeyPair {
    /// Create a key pair from a [`SecretKey`].
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the secret is not a valid scalar.
    pub fn from_secret_key(secret: &SecretKey) -> Result<Self, SignError> {
        Self::from_bytes(*secret.as_bytes())
    }

    /// Verify a signature over a 32-byte digest.
    #[must_use]
    pub fn verify(&self, digest: &[u8; 32], signature: &[u8; 64]) -> bool {
        let Ok(sig) = k256::schnorr::Signature::try_from(signature.as_slice()) else {
            return false;
        };
        self.signing_key
            .verifying_key()
            .verify_raw(digest, &sig)
            .is_ok()
    }

    /// ECDH with `their_key`.
    ///
    /// Accepts SEC1 keys and 32-byte x-only keys (even y assumed).
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidCounterpartyKey`] if the key is not a curve point.
    pub fn shared_secret(&self, their_key: &[u8]) -> Result<[u8; 32], SignError> {
        let sec1 = if their_key.len() == 32 {
            let mut even = Vec::with_capacity(33);
            even.push(0x02);
            even.extend_from_slice(their_key);
            even
        } else {
            their_key.to_vec()
        };
        let theirs = Secp256k1PublicKey::from_sec1(&sec1)?.to_k256()?;
        let shared =
            k256::ecdh::diffie_hellman(self.secret.to_nonzero_scalar(), theirs.as_affine());
        let mut out = [0u8; 32];
        out.copy_from_slice(shared.raw_secret_bytes());
        Ok(out)
    }
}

impl KeyPair for SchnorrKeyPair {
    type Signature = [u8; 64];
    type PublicKey = [u8; 32];

    fn generate() -> Self {
        loop {
            let secret = SecretKey::generate();
            if let Ok(pair) = Self::from_secret_key(&secret) {
                return pair;
            }
        }
    }

    fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignError> {
        let signing_key =
            k256::schnorr::SigningKey::from_bytes(&bytes).map_err(|_| SignError::InvalidKey)?;
        let secret = k256::SecretKey::from_slice(&bytes).map_err(|_| SignError::InvalidKey)?;
        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&signing_key.verifying_key().to_bytes());
        Ok(Self {
            signing_key,
            secret,
            public_key,
        })
    }

    fn public_key(&self) -> &Self::PublicKey {
        &self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, SignError> {
        let digest = digest_array(message)?;
        let mut aux_rand = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut aux_rand);
        let signature = self
            .signing_key
            .sign_raw(digest, &aux_rand)
            .map_err(|_| SignError::signature_failed("schnorr signing failed"))?;
        Ok(signature.to_bytes())
    }
}

impl std::fmt::Debug for SchnorrKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchnorrKeyPair")
            .field("public_key", &hex::encode(self.public_key))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    // ------------------------------------------------------------------------
    // Secp256k1
    // ------------------------------------------------------------------------

    #[test]
    fn test_secp256k1_public_key_encodings() {
        let keypair = Secp256k1KeyPair::from_bytes([0x42u8; 32]).unwrap();
        let pk = keypair.public_key();
        assert!(matches!(pk.compressed()[0], 0x02 | 0x03));
        assert_eq!(pk.uncompressed()[0], 0x04);
        assert_eq!(pk.raw().len(), 64);
        assert_eq!(&pk.uncompressed()[1..33], &pk.compressed()[1..]);
    }

    #[test]
    fn test_secp256k1_from_bytes_invalid_zero() {
        let result = Secp256k1KeyPair::from_bytes([0u8; 32]);
        assert!(matches!(result, Err(SignError::InvalidKey)));
    }

    #[test]
    fn test_secp256k1_sign_and_verify() {
        let keypair = Secp256k1KeyPair::generate();
        let digest = [0x42u8; 32];
        let signature = keypair.sign(&digest).unwrap();
        assert!(signature.recovery_id() <= 1);
        assert!(keypair.verify(&digest, &signature));
        assert!(!keypair.verify(&[0x43u8; 32], &signature));
    }

    #[test]
    fn test_secp256k1_signature_is_low_s() {
        let keypair = Secp256k1KeyPair::generate();
        for i in 0..16u8 {
            let signature = keypair.sign(&[i; 32]).unwrap();
            let parsed = K256Signature::from_slice(signature.as_ref()).unwrap();
            assert!(parsed.normalize_s().is_none(), "s must already be low");
        }
    }

    #[test]
    fn test_secp256k1_recovery_id_recovers_key() {
        let keypair = Secp256k1KeyPair::generate();
        let digest = [0x07u8; 32];
        let signature = keypair.sign(&digest).unwrap();

        let parsed = K256Signature::from_slice(signature.as_ref()).unwrap();
        let recid = RecoveryId::from_byte(signature.recovery_id()).unwrap();
        let recovered = VerifyingKey::recover_from_prehash(&digest, &parsed, recid).unwrap();
        assert_eq!(
            recovered.to_encoded_point(true).as_bytes(),
            keypair.public_key().compressed()
        );
    }

    #[test]
    fn test_secp256k1_rejects_non_digest() {
        let keypair = Secp256k1KeyPair::generate();
        let err = keypair.sign(b"short").unwrap_err();
        assert!(matches!(err, SignError::InvalidPayload { .. }));
    }

    #[test]
    fn test_secp256k1_der_encoding() {
        let keypair = Secp256k1KeyPair::generate();
        let der = keypair.sign(&[1u8; 32]).unwrap().to_der().unwrap();
        assert_eq!(der[0], 0x30);
        assert!(der.len() <= 72);
    }

    #[test]
    fn test_secp256k1_shared_secret_is_symmetric() {
        let alice = Secp256k1KeyPair::generate();
        let bob = Secp256k1KeyPair::generate();
        let ab = alice
            .shared_secret(bob.public_key().uncompressed())
            .unwrap();
        let ba = bob.shared_secret(alice.public_key().compressed()).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_secp256k1_shared_secret_rejects_garbage() {
        let alice = Secp256k1KeyPair::generate();
        let err = alice.shared_secret(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, SignError::InvalidCounterpartyKey { .. }));
    }

    // ------------------------------------------------------------------------
    // Ed25519
    // ------------------------------------------------------------------------

    #[test]
    fn test_ed25519_signs_arbitrary_messages() {
        let keypair = Ed25519KeyPair::generate();
        let message = b"a solana message that is longer than thirty-two bytes";
        let signature = keypair.sign(message).unwrap();
        assert_eq!(signature.as_ref().len(), 64);
        assert!(keypair.verify(message, &signature));
    }

    #[test]
    fn test_ed25519_deterministic() {
        let a = Ed25519KeyPair::from_bytes([9u8; 32]).unwrap();
        let b = Ed25519KeyPair::from_bytes([9u8; 32]).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(b"m").unwrap(), b.sign(b"m").unwrap());
    }

    #[test]
    fn test_ed25519_from_keypair_checks_public_key() {
        let secret = SecretKey::new([3u8; 32]);
        let expected = *Ed25519KeyPair::from_secret_key(&secret)
            .unwrap()
            .public_key()
            .as_bytes();
        assert!(Ed25519KeyPair::from_keypair(&secret, &expected).is_ok());
        assert_eq!(
            Ed25519KeyPair::from_keypair(&secret, &[0u8; 32]).unwrap_err(),
            SignError::InvalidKey
        );
    }

    // ------------------------------------------------------------------------
    // Schnorr
    // ------------------------------------------------------------------------

    #[test]
    fn test_schnorr_sign_and_verify() {
        let keypair = SchnorrKeyPair::generate();
        let digest = [0x55u8; 32];
        let signature = keypair.sign(&digest).unwrap();
        assert!(keypair.verify(&digest, &signature));
        assert_eq!(keypair.public_key().len(), 32);
    }

    #[test]
    fn test_schnorr_shared_secret_matches_ecdsa() {
        let schnorr = SchnorrKeyPair::from_bytes([0x21u8; 32]).unwrap();
        let ecdsa = Secp256k1KeyPair::from_bytes([0x21u8; 32]).unwrap();
        let other = Secp256k1KeyPair::generate();
        let theirs = other.public_key().compressed();
        assert_eq!(
            schnorr.shared_secret(theirs).unwrap(),
            ecdsa.shared_secret(theirs).unwrap()
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let keypair = Secp256k1KeyPair::from_bytes([0x42u8; 32]).unwrap();
        let debug = format!("{keypair:?}");
        assert!(debug.contains("public_key"));
        assert!(!debug.contains("signing_key"));
    }
}
