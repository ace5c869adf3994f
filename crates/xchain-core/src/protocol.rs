//! Protocol identifiers and the capability matrix.
//!
//! A [`Protocol`] names a blockchain family that shares one transaction,
//! address and signature scheme. The capability matrix maps every supported
//! protocol to exactly one [`SignatureAlgorithm`] and one [`PublicKeyFormat`].
//!
//! # Example
//!
//! ```rust
//! use xchain_core::protocol::{Protocol, PublicKeyFormat, SignatureAlgorithm};
//!
//! assert_eq!(Protocol::EVM.signature_algorithm(), Some(SignatureAlgorithm::K256Keccak));
//! assert_eq!(Protocol::EVM.public_key_format(), Some(PublicKeyFormat::Uncompressed));
//!
//! // Unknown protocols have no capabilities.
//! assert_eq!(Protocol::from("chainkit").signature_algorithm(), None);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DefectError;

// ============================================================================
// Protocol
// ============================================================================

/// Identifier of a blockchain family.
///
/// Supported protocols are available as associated constants and borrow a
/// `'static` string. Parsing an arbitrary string always succeeds: a chain
/// configuration may name a protocol this build does not support, and that
/// must surface as a resolve error rather than a parse error.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Protocol(Cow<'static, str>);

impl Protocol {
    /// Bitcoin and segwit-capable forks.
    pub const BTC: Self = Self(Cow::Borrowed("btc"));
    /// Bitcoin Cash (CashAddr addresses, forkid sighash).
    pub const BTC_CASH: Self = Self(Cow::Borrowed("btc-cash"));
    /// Bitcoin-derived chains without segwit (Dogecoin, Litecoin legacy).
    pub const BTC_LEGACY: Self = Self(Cow::Borrowed("btc-legacy"));
    /// Cosmos-SDK chains.
    pub const COSMOS: Self = Self(Cow::Borrowed("cosmos"));
    /// Cosmos-SDK chains with Ethereum-style keys.
    pub const EVMOS: Self = Self(Cow::Borrowed("evmos"));
    /// EVM chains with EIP-1559 fees.
    pub const EVM: Self = Self(Cow::Borrowed("evm"));
    /// EVM chains with legacy gas pricing.
    pub const EVM_LEGACY: Self = Self(Cow::Borrowed("evm-legacy"));
    /// Solana.
    pub const SOLANA: Self = Self(Cow::Borrowed("solana"));
    /// Tron.
    pub const TRON: Self = Self(Cow::Borrowed("tron"));
    /// The Open Network.
    pub const TON: Self = Self(Cow::Borrowed("ton"));

    /// Returns the protocol identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this protocol is in [`SUPPORTED_PROTOCOLS`].
    #[must_use]
    pub fn is_supported(&self) -> bool {
        SUPPORTED_PROTOCOLS.contains(self)
    }

    /// Signature algorithm used by this protocol.
    ///
    /// Returns `None` for protocols outside [`SUPPORTED_PROTOCOLS`]. A `None`
    /// for a supported protocol is a coverage bug; use
    /// [`require_signature_algorithm`](Self::require_signature_algorithm)
    /// where a value is mandatory.
    #[must_use]
    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        match self.as_str() {
            "btc" | "btc-cash" | "btc-legacy" => Some(SignatureAlgorithm::K256Sha256),
            "evm" | "evm-legacy" | "cosmos" | "evmos" | "tron" => {
                Some(SignatureAlgorithm::K256Keccak)
            }
            "solana" | "ton" => Some(SignatureAlgorithm::Ed25519),
            _ => None,
        }
    }

    /// Public key encoding expected by this protocol's address derivation.
    #[must_use]
    pub fn public_key_format(&self) -> Option<PublicKeyFormat> {
        match self.as_str() {
            "btc" | "btc-cash" | "btc-legacy" | "cosmos" | "evmos" => {
                Some(PublicKeyFormat::Compressed)
            }
            "evm" | "evm-legacy" | "tron" => Some(PublicKeyFormat::Uncompressed),
            "solana" | "ton" => Some(PublicKeyFormat::Raw),
            _ => None,
        }
    }

    /// Like [`signature_algorithm`](Self::signature_algorithm) but treats a
    /// missing entry as a defect.
    ///
    /// # Errors
    ///
    /// Returns [`DefectError::MissingCapability`] if the matrix has no entry.
    pub fn require_signature_algorithm(&self) -> Result<SignatureAlgorithm, DefectError> {
        self.signature_algorithm().ok_or_else(|| {
            DefectError::missing_capability(self.as_str(), "signature algorithm")
        })
    }

    /// Like [`public_key_format`](Self::public_key_format) but treats a
    /// missing entry as a defect.
    ///
    /// # Errors
    ///
    /// Returns [`DefectError::MissingCapability`] if the matrix has no entry.
    pub fn require_public_key_format(&self) -> Result<PublicKeyFormat, DefectError> {
        self.public_key_format()
            .ok_or_else(|| DefectError::missing_capability(self.as_str(), "public key format"))
    }
}

/// Every protocol with a full set of capabilities, in canonical order.
pub static SUPPORTED_PROTOCOLS: [Protocol; 10] = [
    Protocol::BTC,
    Protocol::BTC_CASH,
    Protocol::BTC_LEGACY,
    Protocol::COSMOS,
    Protocol::EVMOS,
    Protocol::EVM,
    Protocol::EVM_LEGACY,
    Protocol::SOLANA,
    Protocol::TRON,
    Protocol::TON,
];

impl From<&str> for Protocol {
    fn from(value: &str) -> Self {
        SUPPORTED_PROTOCOLS
            .iter()
            .find(|p| p.as_str() == value)
            .cloned()
            .unwrap_or_else(|| Self(Cow::Owned(value.to_string())))
    }
}

impl From<String> for Protocol {
    fn from(value: String) -> Self {
        match SUPPORTED_PROTOCOLS.iter().find(|p| p.as_str() == value) {
            Some(known) => known.clone(),
            None => Self(Cow::Owned(value)),
        }
    }
}

impl FromStr for Protocol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for Protocol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Protocol {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Protocol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Protocol({})", self.as_str())
    }
}

impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Protocol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SignatureAlgorithm
// ============================================================================

/// Signature scheme a protocol signs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// ECDSA over secp256k1, Keccak-256 message digest.
    #[serde(rename = "k256-keccak")]
    K256Keccak,
    /// ECDSA over secp256k1, SHA-256 message digest.
    #[serde(rename = "k256-sha256")]
    K256Sha256,
    /// EdDSA over Curve25519.
    #[serde(rename = "ed25519")]
    Ed25519,
    /// BIP-340 Schnorr over secp256k1.
    #[serde(rename = "schnorr")]
    Schnorr,
}

impl SignatureAlgorithm {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::K256Keccak => "k256-keccak",
            Self::K256Sha256 => "k256-sha256",
            Self::Ed25519 => "ed25519",
            Self::Schnorr => "schnorr",
        }
    }

    /// Returns `true` for the secp256k1 based algorithms.
    #[must_use]
    pub const fn is_secp256k1(self) -> bool {
        matches!(self, Self::K256Keccak | Self::K256Sha256 | Self::Schnorr)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PublicKeyFormat
// ============================================================================

/// Encoding of a public key handed to address derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicKeyFormat {
    /// Curve-native raw bytes (32-byte ed25519 keys).
    Raw,
    /// SEC1 compressed secp256k1 point (33 bytes).
    Compressed,
    /// SEC1 uncompressed secp256k1 point (65 bytes).
    Uncompressed,
}

impl PublicKeyFormat {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Compressed => "compressed",
            Self::Uncompressed => "uncompressed",
        }
    }
}

impl fmt::Display for PublicKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_capability_matrix_is_complete() {
        for protocol in &SUPPORTED_PROTOCOLS {
            assert!(
                protocol.signature_algorithm().is_some(),
                "missing signature algorithm for {protocol}"
            );
            assert!(
                protocol.public_key_format().is_some(),
                "missing public key format for {protocol}"
            );
            assert!(protocol.require_signature_algorithm().is_ok());
            assert!(protocol.require_public_key_format().is_ok());
        }
    }

    #[test]
    fn test_capability_matrix_values() {
        assert_eq!(
            Protocol::BTC_CASH.signature_algorithm(),
            Some(SignatureAlgorithm::K256Sha256)
        );
        assert_eq!(
            Protocol::COSMOS.signature_algorithm(),
            Some(SignatureAlgorithm::K256Keccak)
        );
        assert_eq!(
            Protocol::COSMOS.public_key_format(),
            Some(PublicKeyFormat::Compressed)
        );
        assert_eq!(
            Protocol::TRON.public_key_format(),
            Some(PublicKeyFormat::Uncompressed)
        );
        assert_eq!(
            Protocol::TON.signature_algorithm(),
            Some(SignatureAlgorithm::Ed25519)
        );
        assert_eq!(Protocol::SOLANA.public_key_format(), Some(PublicKeyFormat::Raw));
    }

    #[test]
    fn test_unknown_protocol_is_a_defect_when_required() {
        let unknown = Protocol::from("chainkit");
        assert!(!unknown.is_supported());
        let err = unknown.require_public_key_format().unwrap_err();
        assert!(matches!(err, DefectError::MissingCapability { .. }));
    }

    #[test]
    fn test_supported_order() {
        let names: Vec<&str> = SUPPORTED_PROTOCOLS.iter().map(Protocol::as_str).collect();
        assert_eq!(
            names,
            vec![
                "btc",
                "btc-cash",
                "btc-legacy",
                "cosmos",
                "evmos",
                "evm",
                "evm-legacy",
                "solana",
                "tron",
                "ton"
            ]
        );
    }

    #[test]
    fn test_parse_interns_known_values() {
        let parsed: Protocol = "evm-legacy".parse().unwrap();
        assert_eq!(parsed, Protocol::EVM_LEGACY);
        assert!(matches!(parsed.0, Cow::Borrowed(_)));
        assert_eq!(Protocol::from("custom".to_string()).as_str(), "custom");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&Protocol::TRON).unwrap();
        assert_eq!(json, "\"tron\"");
        let back: Protocol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Protocol::TRON);

        let alg: SignatureAlgorithm = serde_json::from_str("\"k256-sha256\"").unwrap();
        assert_eq!(alg, SignatureAlgorithm::K256Sha256);
    }
}
