//! # xchain-crypto
//!
//! Key material and signing for the xchain cross-chain custody layer.
//!
//! ## Modules
//!
//! - [`keys`] - [`SecretKey`] with zeroization and secret text decoding
//! - [`keypair`] - secp256k1 ECDSA, ed25519 and BIP-340 Schnorr key pairs
//! - [`signer`] - The [`Signer`] contract and [`LocalSigner`]
//!
//! ## Supported Algorithms
//!
//! - ECDSA (secp256k1) with Keccak-256 or SHA-256 message hashing
//! - `EdDSA` (Ed25519)
//! - Schnorr (BIP-340)
//!
//! ## Security
//!
//! - No unsafe code allowed
//! - Secret bytes are zeroized on drop and never printed
//! - Secret comparison is constant time

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod keypair;
pub mod keys;
pub mod signer;

pub use keys::{decode_ed25519_secret, SecretKey, KEYPAIR_LEN, SECRET_KEY_LEN};

pub use keypair::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, KeyPair, SchnorrKeyPair,
    Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature,
};

pub use signer::{LocalSigner, Signer};
