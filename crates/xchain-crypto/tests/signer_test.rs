//! Integration tests for the signer contract across the capability matrix.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::thread;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use proptest::prelude::*;
use sha3::{Digest, Keccak256};
use xchain_core::{Protocol, PublicKeyFormat, SignatureAlgorithm, SUPPORTED_PROTOCOLS};
use xchain_crypto::{LocalSigner, Signer};

const SECRET: &str = "0x8da4ef21b864d2cc526dbdb2a120bd2874c36c9d0a1fb7f8c63d7f7a8b41de8f";

#[test]
fn every_supported_protocol_has_a_local_signer() {
    for protocol in &SUPPORTED_PROTOCOLS {
        let signer = LocalSigner::new(protocol, SECRET).unwrap();
        let public_key = signer.public_key().unwrap();
        let expected_len = match protocol.public_key_format().unwrap() {
            PublicKeyFormat::Compressed => 33,
            PublicKeyFormat::Uncompressed => 65,
            PublicKeyFormat::Raw => 32,
        };
        assert_eq!(public_key.len(), expected_len, "{protocol}");
    }
}

#[test]
fn keccak_signature_recovers_to_uncompressed_public_key() {
    let signer = LocalSigner::new(&Protocol::EVM, SECRET).unwrap();
    let message = b"transfer 1 wei";
    let signature = signer.sign(message).unwrap();

    let digest = Keccak256::digest(message);
    let (rs, v) = signature.as_bytes().split_at(64);
    let sig = Signature::from_slice(rs).unwrap();
    let recovered =
        VerifyingKey::recover_from_prehash(&digest, &sig, RecoveryId::from_byte(v[0]).unwrap())
            .unwrap();

    assert_eq!(
        recovered.to_encoded_point(false).as_bytes(),
        signer.public_key().unwrap().as_slice()
    );
}

#[test]
fn signer_is_shareable_across_threads() {
    let signer: Arc<dyn Signer> = Arc::new(LocalSigner::new(&Protocol::SOLANA, SECRET).unwrap());
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let signer = Arc::clone(&signer);
            thread::spawn(move || signer.sign(&[i; 48]).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().len(), 64);
    }
    assert_eq!(signer.algorithm(), SignatureAlgorithm::Ed25519);
}

proptest! {
    #[test]
    fn secp256k1_signatures_are_always_65_bytes(payload in proptest::collection::vec(any::<u8>(), 1..256)) {
        let signer = LocalSigner::new(&Protocol::COSMOS, SECRET).unwrap();
        let signature = signer.sign(&payload).unwrap();
        prop_assert_eq!(signature.len(), 65);
        prop_assert!(signature.as_bytes()[64] <= 1);
    }
}
