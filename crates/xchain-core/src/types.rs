//! Core value types shared by builders, signers and callers.
//!
//! - [`Address`] / [`PossibleAddress`] / [`AddressType`] - derived addresses
//! - [`TransferArgs`] - what to move, from where, to where
//! - [`SighashPayload`] / [`TxSignature`] / [`TxHash`] - the signing handshake
//!
//! # Example
//!
//! ```rust
//! use xchain_core::types::{Address, TransferArgs};
//! use xchain_core::U256;
//!
//! let args = TransferArgs::new(
//!     Address::new("cosmos1from"),
//!     Address::new("cosmos1to"),
//!     U256::from(1_000_000u64),
//! )
//! .with_memo("invoice 42");
//!
//! assert_eq!(args.memo(), Some("invoice 42"));
//! assert!(args.asset().is_none());
//! ```

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::asset::AssetConfig;

// ============================================================================
// Addresses
// ============================================================================

/// An address in the chain's native encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the address string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which derivation an address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    /// The chain's single canonical form.
    Default,
    /// Base58 pay-to-pubkey-hash.
    Legacy,
    /// Native segwit v0 (bech32).
    SegWit,
    /// TON user-friendly, bounce flag set.
    Bounceable,
    /// TON user-friendly, bounce flag cleared.
    NonBounceable,
    /// TON raw `workchain:hex` form.
    Raw,
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Default => "default",
            Self::Legacy => "legacy",
            Self::SegWit => "segwit",
            Self::Bounceable => "bounceable",
            Self::NonBounceable => "non_bounceable",
            Self::Raw => "raw",
        };
        f.write_str(s)
    }
}

/// One of several valid addresses derivable from the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleAddress {
    /// The address.
    pub address: Address,
    /// The derivation it came from.
    pub address_type: AddressType,
}

impl PossibleAddress {
    /// Pair an address with its type.
    #[must_use]
    pub const fn new(address: Address, address_type: AddressType) -> Self {
        Self {
            address,
            address_type,
        }
    }
}

// ============================================================================
// Transfer arguments
// ============================================================================

/// Arguments of a transfer or task request.
///
/// Constructed once per request and read, never modified, by builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferArgs {
    from: Address,
    to: Address,
    amount: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    asset: Option<AssetConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
}

impl TransferArgs {
    /// Transfer of `amount` (smallest unit) from `from` to `to`.
    #[must_use]
    pub const fn new(from: Address, to: Address, amount: U256) -> Self {
        Self {
            from,
            to,
            amount,
            asset: None,
            memo: None,
        }
    }

    /// Attach an asset or task configuration.
    #[must_use]
    pub fn with_asset(mut self, asset: AssetConfig) -> Self {
        self.asset = Some(asset);
        self
    }

    /// Attach a memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Source address.
    #[must_use]
    pub const fn from(&self) -> &Address {
        &self.from
    }

    /// Destination address.
    #[must_use]
    pub const fn to(&self) -> &Address {
        &self.to
    }

    /// Amount in the asset's smallest unit.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        self.amount
    }

    /// Asset or task configuration.
    #[must_use]
    pub const fn asset(&self) -> Option<&AssetConfig> {
        self.asset.as_ref()
    }

    /// Memo, if any.
    #[must_use]
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}

// ============================================================================
// Signing handshake
// ============================================================================

/// Bytes a signer must sign for one signature slot of a transaction.
///
/// For secp256k1 chains this is a 32-byte digest; for ed25519 chains it is
/// the full message.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SighashPayload(Vec<u8>);

impl SighashPayload {
    /// Wrap payload bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SighashPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SighashPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SighashPayload({})", hex::encode(&self.0))
    }
}

/// A signature produced by a signer.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(Vec<u8>);

impl TxSignature {
    /// Wrap signature bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Signature length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the signature has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for TxSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxSignature({})", hex::encode(&self.0))
    }
}

/// A transaction hash in the chain's display encoding.
///
/// Empty when the chain cannot name the transaction yet, typically before
/// signatures are added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Wrap a hash string.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no hash is available yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::asset::{NativeAsset, TaskConfig};

    #[test]
    fn test_transfer_args_accessors() {
        let task = AssetConfig::Task(TaskConfig::new("CosmosDelegateOperator", NativeAsset::Atom));
        let args = TransferArgs::new("a".into(), "b".into(), U256::from(7u64)).with_asset(task);
        assert_eq!(args.from().as_str(), "a");
        assert_eq!(args.to().as_str(), "b");
        assert_eq!(args.amount(), U256::from(7u64));
        assert_eq!(args.asset().map(AssetConfig::id), Some("CosmosDelegateOperator"));
        assert_eq!(args.memo(), None);
    }

    #[test]
    fn test_transfer_args_json() {
        let args = TransferArgs::new("a".into(), "b".into(), U256::from(10u64)).with_memo("m");
        let json = serde_json::to_string(&args).unwrap();
        assert!(!json.contains("asset"));
        let back: TransferArgs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, args);
    }

    #[test]
    fn test_debug_is_hex() {
        let sig = TxSignature::new(vec![0xde, 0xad]);
        assert_eq!(format!("{sig:?}"), "TxSignature(dead)");
        assert_eq!(sig.len(), 2);
        assert!(TxHash::default().is_empty());
    }
}
