//! Base58 account addresses and program-derived addresses.

use sha2::{Digest, Sha256};
use xchain_core::config::ChainConfig;
use xchain_core::error::AddressError;
use xchain_core::protocol::PublicKeyFormat;
use xchain_core::types::Address;

use crate::address::{extract_public_key, AddressBuilder};

/// A 32-byte account key.
pub type Pubkey = [u8; 32];

/// System program.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
/// SPL token program.
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
/// Associated token account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hR3nkcuyUn1mi2vBpFxJCvbJ8";
/// Memo program (v2).
pub const MEMO_PROGRAM_ID: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMbWCSCSWSo7rsKnGRJXMF";

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Decode a base58 account key.
///
/// # Errors
///
/// Returns [`AddressError::InvalidFormat`] unless `address` is base58 of
/// exactly 32 bytes.
pub fn parse_pubkey(address: &str) -> Result<Pubkey, AddressError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        AddressError::invalid_format(address, format!("expected 32 bytes, got {}", bytes.len()))
    })
}

/// Base58 encoding of a key.
#[must_use]
pub fn encode_pubkey(key: &Pubkey) -> String {
    bs58::encode(key).into_string()
}

fn is_on_curve(bytes: &Pubkey) -> bool {
    ed25519_dalek::VerifyingKey::from_bytes(bytes).is_ok()
}

/// The first off-curve address derived from `seeds` and a bump seed,
/// counting down from 255.
///
/// # Errors
///
/// Returns [`AddressError::Encoding`] if no bump yields an off-curve point.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), AddressError> {
    for bump in (0..=u8::MAX).rev() {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        hasher.update([bump]);
        hasher.update(program_id);
        hasher.update(PDA_MARKER);
        let candidate: Pubkey = hasher.finalize().into();
        if !is_on_curve(&candidate) {
            return Ok((candidate, bump));
        }
    }
    Err(AddressError::encoding("no viable program address bump"))
}

/// The associated token account of `owner` for `mint`.
///
/// # Errors
///
/// Returns [`AddressError`] if a program id is malformed or no address can
/// be derived.
pub fn associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey, AddressError> {
    let program = parse_pubkey(ASSOCIATED_TOKEN_PROGRAM_ID)?;
    let (address, _) = find_program_address(&[owner, token_program, mint], &program)?;
    Ok(address)
}

/// Address builder for solana.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaAddressBuilder;

impl SolanaAddressBuilder {
    /// Builder for `config`.
    #[must_use]
    pub const fn new(_config: &ChainConfig) -> Self {
        Self
    }
}

impl AddressBuilder for SolanaAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        let raw = extract_public_key(PublicKeyFormat::Raw, public_key)?;
        Ok(Address::new(bs58::encode(raw).into_string()))
    }
}
