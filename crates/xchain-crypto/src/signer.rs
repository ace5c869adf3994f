//! The signing contract and the local-key signer.
//!
//! A [`Signer`] turns the sighash payloads produced by a transaction builder
//! into signatures. It knows its [`SignatureAlgorithm`] so a caller can check
//! it against the capability matrix of the chain it signs for.
//!
//! # Signature formats
//!
//! | Algorithm | Payload | Output |
//! |-----------|---------|--------|
//! | `k256-keccak` | 32-byte digest, or message hashed with Keccak-256 | 65 bytes `r \|\| s \|\| v` |
//! | `k256-sha256` | 32-byte digest, or message hashed with SHA-256 | 65 bytes `r \|\| s \|\| v` |
//! | `ed25519` | message | 64 bytes |
//! | `schnorr` | 32-byte digest, or message hashed with SHA-256 | 64 bytes (BIP-340) |
//!
//! # Example
//!
//! ```rust
//! use xchain_core::Protocol;
//! use xchain_crypto::signer::{LocalSigner, Signer};
//!
//! let signer = LocalSigner::new(
//!     &Protocol::EVM,
//!     "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
//! )
//! .expect("valid key");
//!
//! assert_eq!(signer.public_key().expect("public key").len(), 65);
//! let signature = signer.sign(&[0x42u8; 32]).expect("signing failed");
//! assert_eq!(signature.len(), 65);
//! ```

use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::keypair::{Ed25519KeyPair, KeyPair, SchnorrKeyPair, Secp256k1KeyPair};
use crate::keys::{decode_ed25519_secret, SecretKey};
use xchain_core::error::SignError;
use xchain_core::protocol::{Protocol, PublicKeyFormat, SignatureAlgorithm};
use xchain_core::types::TxSignature;

// ============================================================================
// Signer Trait
// ============================================================================

/// Produces signatures for sighash payloads.
///
/// Implementations must be `Send + Sync`; one signer may serve concurrent
/// requests.
pub trait Signer: Send + Sync + std::fmt::Debug {
    /// Public key in the format the chain's address derivation expects.
    ///
    /// # Errors
    ///
    /// Returns a [`SignError`] if the key cannot be exported.
    fn public_key(&self) -> Result<Vec<u8>, SignError>;

    /// Key agreement with a counterparty, if the algorithm supports it.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidCounterpartyKey`] if `their_key` is not
    /// usable.
    fn shared_key(&self, their_key: &[u8]) -> Result<Option<Vec<u8>>, SignError>;

    /// Sign one payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidPayload`] if the payload does not fit the
    /// algorithm, or [`SignError::SignatureFailed`] if signing fails.
    fn sign(&self, payload: &[u8]) -> Result<TxSignature, SignError>;

    /// The algorithm this signer produces.
    fn algorithm(&self) -> SignatureAlgorithm;
}

// ============================================================================
// LocalSigner
// ============================================================================

enum LocalKey {
    Secp256k1(Secp256k1KeyPair),
    Ed25519(Ed25519KeyPair),
    Schnorr(SchnorrKeyPair),
}

/// Signer backed by a secret held in process memory.
pub struct LocalSigner {
    key: LocalKey,
    algorithm: SignatureAlgorithm,
    public_key_format: PublicKeyFormat,
}

impl LocalSigner {
    /// Create a signer for `protocol` from a textual secret.
    ///
    /// The algorithm and public key format come from the capability matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::Defect`] if `protocol` has no matrix entry, or
    /// [`SignError::InvalidKey`] if the secret cannot be decoded.
    pub fn new(protocol: &Protocol, secret: &str) -> Result<Self, SignError> {
        let algorithm = protocol.require_signature_algorithm()?;
        let format = protocol.require_public_key_format()?;
        Self::with_algorithm(algorithm, format, secret)
    }

    /// Create a signer for an explicit algorithm and public key format.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidKey`] if the secret cannot be decoded for
    /// `algorithm`.
    pub fn with_algorithm(
        algorithm: SignatureAlgorithm,
        public_key_format: PublicKeyFormat,
        secret: &str,
    ) -> Result<Self, SignError> {
        let key = match algorithm {
            SignatureAlgorithm::K256Keccak | SignatureAlgorithm::K256Sha256 => {
                LocalKey::Secp256k1(Secp256k1KeyPair::from_secret_key(&SecretKey::from_hex(
                    secret,
                )?)?)
            }
            SignatureAlgorithm::Schnorr => {
                LocalKey::Schnorr(SchnorrKeyPair::from_secret_key(&SecretKey::from_hex(secret)?)?)
            }
            SignatureAlgorithm::Ed25519 => {
                let (seed, expected) = decode_ed25519_secret(secret)?;
                let pair = match expected {
                    Some(public) => Ed25519KeyPair::from_keypair(&seed, &public)?,
                    None => Ed25519KeyPair::from_secret_key(&seed)?,
                };
                LocalKey::Ed25519(pair)
            }
        };

        tracing::debug!(algorithm = %algorithm.as_str(), "created local signer");

        Ok(Self {
            key,
            algorithm,
            public_key_format,
        })
    }

    fn digest(&self, payload: &[u8]) -> Result<[u8; 32], SignError> {
        if payload.is_empty() {
            return Err(SignError::invalid_payload("empty payload"));
        }
        if let Ok(digest) = <[u8; 32]>::try_from(payload) {
            return Ok(digest);
        }
        let digest = match self.algorithm {
            SignatureAlgorithm::K256Keccak => Keccak256::digest(payload).into(),
            _ => Sha256::digest(payload).into(),
        };
        Ok(digest)
    }
}

impl Signer for LocalSigner {
    fn public_key(&self) -> Result<Vec<u8>, SignError> {
        let bytes = match &self.key {
            LocalKey::Secp256k1(pair) => {
                let pk = pair.public_key();
                match self.public_key_format {
                    PublicKeyFormat::Compressed => pk.compressed().to_vec(),
                    PublicKeyFormat::Uncompressed => pk.uncompressed().to_vec(),
                    PublicKeyFormat::Raw => pk.raw().to_vec(),
                }
            }
            LocalKey::Ed25519(pair) => pair.public_key().as_bytes().to_vec(),
            LocalKey::Schnorr(pair) => pair.public_key().to_vec(),
        };
        Ok(bytes)
    }

    fn shared_key(&self, their_key: &[u8]) -> Result<Option<Vec<u8>>, SignError> {
        match &self.key {
            LocalKey::Secp256k1(pair) => Ok(Some(pair.shared_secret(their_key)?.to_vec())),
            LocalKey::Schnorr(pair) => Ok(Some(pair.shared_secret(their_key)?.to_vec())),
            LocalKey::Ed25519(_) => Ok(None),
        }
    }

    fn sign(&self, payload: &[u8]) -> Result<TxSignature, SignError> {
        let signature = match &self.key {
            LocalKey::Secp256k1(pair) => {
                let digest = self.digest(payload)?;
                pair.sign(&digest)?.to_recoverable_bytes().to_vec()
            }
            LocalKey::Schnorr(pair) => {
                let digest = self.digest(payload)?;
                pair.sign(&digest)?.to_vec()
            }
            LocalKey::Ed25519(pair) => pair.sign(payload)?.as_ref().to_vec(),
        };
        Ok(TxSignature::new(signature))
    }

    fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("algorithm", &self.algorithm)
            .field("public_key_format", &self.public_key_format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    const SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_public_key_follows_matrix_format() {
        let evm = LocalSigner::new(&Protocol::EVM, SECRET).unwrap();
        let btc = LocalSigner::new(&Protocol::BTC, SECRET).unwrap();
        let sol = LocalSigner::new(&Protocol::SOLANA, SECRET).unwrap();

        assert_eq!(evm.public_key().unwrap().len(), 65);
        assert_eq!(btc.public_key().unwrap().len(), 33);
        assert_eq!(sol.public_key().unwrap().len(), 32);
        assert_eq!(&evm.public_key().unwrap()[1..33], &btc.public_key().unwrap()[1..]);
    }

    #[test]
    fn test_algorithm_follows_matrix() {
        for protocol in &xchain_core::SUPPORTED_PROTOCOLS {
            let signer = LocalSigner::new(protocol, SECRET).unwrap();
            assert_eq!(Some(signer.algorithm()), protocol.signature_algorithm());
        }
    }

    #[test]
    fn test_unknown_protocol_is_defect() {
        let err = LocalSigner::new(&Protocol::from("chainkit"), SECRET).unwrap_err();
        assert!(matches!(err, SignError::Defect(_)));
    }

    #[test]
    fn test_digest_payload_is_signed_directly() {
        let signer = LocalSigner::new(&Protocol::TRON, SECRET).unwrap();
        let pair = Secp256k1KeyPair::from_secret_key(&SecretKey::from_hex(SECRET).unwrap()).unwrap();
        let digest = [0x11u8; 32];
        let sig = signer.sign(&digest).unwrap();
        assert_eq!(sig.len(), 65);
        assert_eq!(sig.as_bytes(), pair.sign(&digest).unwrap().to_recoverable_bytes());
    }

    #[test]
    fn test_long_payload_is_hashed_with_algorithm_hash() {
        let payload = b"a message longer than one digest, hashed first";
        let keccak = LocalSigner::new(&Protocol::EVM, SECRET).unwrap();
        let sha = LocalSigner::new(&Protocol::BTC, SECRET).unwrap();

        let expected: [u8; 32] = Keccak256::digest(payload).into();
        assert_eq!(keccak.sign(payload).unwrap(), keccak.sign(&expected).unwrap());

        let expected: [u8; 32] = Sha256::digest(payload).into();
        assert_eq!(sha.sign(payload).unwrap(), sha.sign(&expected).unwrap());
    }

    #[test]
    fn test_empty_payload_rejected_for_ecdsa() {
        let signer = LocalSigner::new(&Protocol::EVM, SECRET).unwrap();
        assert!(matches!(
            signer.sign(&[]).unwrap_err(),
            SignError::InvalidPayload { .. }
        ));
    }

    #[test]
    fn test_ed25519_signs_full_message_and_has_no_shared_key() {
        let signer = LocalSigner::new(&Protocol::TON, SECRET).unwrap();
        let sig = signer.sign(b"any length message").unwrap();
        assert_eq!(sig.len(), 64);
        assert_eq!(signer.shared_key(&[2u8; 33]).unwrap(), None);
    }

    #[test]
    fn test_ed25519_accepts_base58_keypair() {
        let seed = SecretKey::from_hex(SECRET).unwrap();
        let pair = Ed25519KeyPair::from_secret_key(&seed).unwrap();
        let mut keypair = Vec::with_capacity(64);
        keypair.extend_from_slice(seed.as_bytes());
        keypair.extend_from_slice(pair.public_key().as_bytes());
        let encoded = bs58::encode(&keypair).into_string();

        let signer = LocalSigner::new(&Protocol::SOLANA, &encoded).unwrap();
        assert_eq!(signer.public_key().unwrap(), pair.public_key().as_bytes().to_vec());
    }

    #[test]
    fn test_shared_key_is_symmetric() {
        let a = LocalSigner::new(&Protocol::COSMOS, SECRET).unwrap();
        let b = LocalSigner::new(
            &Protocol::COSMOS,
            "0101010101010101010101010101010101010101010101010101010101010101",
        )
        .unwrap();
        let ab = a.shared_key(&b.public_key().unwrap()).unwrap().unwrap();
        let ba = b.shared_key(&a.public_key().unwrap()).unwrap().unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 32);
    }

    #[test]
    fn test_schnorr_signer() {
        let signer = LocalSigner::with_algorithm(
            SignatureAlgorithm::Schnorr,
            PublicKeyFormat::Raw,
            SECRET,
        )
        .unwrap();
        assert_eq!(signer.public_key().unwrap().len(), 32);
        assert_eq!(signer.sign(&[9u8; 32]).unwrap().len(), 64);
        assert!(signer.shared_key(&signer.public_key().unwrap()).unwrap().is_some());
    }

    #[test]
    fn test_invalid_secret() {
        assert_eq!(
            LocalSigner::new(&Protocol::EVM, "not hex").unwrap_err(),
            SignError::InvalidKey
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let signer = LocalSigner::new(&Protocol::EVM, SECRET).unwrap();
        let debug = format!("{signer:?}");
        assert!(!debug.contains("4c0883"));
        assert!(debug.contains("K256Keccak"));
    }
}
