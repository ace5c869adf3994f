//! Transaction-input variant tags.
//!
//! Staking-family transaction inputs carry a [`TxVariantInputType`]: a
//! namespaced string `protocols/<protocol>/<operation>/<provider>` that
//! identifies exactly which protocol, operation and staking provider the input
//! was fetched for. The string form is what gets persisted and logged.
//!
//! [`InputKind`] is the capability marker attached to every transaction input.
//! Consumers match on it instead of probing the input's concrete type.
//!
//! # Example
//!
//! ```rust
//! use xchain_core::protocol::Protocol;
//! use xchain_core::variant::{Operation, TxVariantInputType};
//!
//! let tag = TxVariantInputType::staking(&Protocol::COSMOS, "native");
//! assert_eq!(tag.as_str(), "protocols/cosmos/staking/native");
//! assert!(tag.validate().is_ok());
//! assert_eq!(tag.blockchain(), Protocol::COSMOS);
//! assert_eq!(tag.variant(), "native");
//! assert_eq!(tag.operation(), Some(Operation::Staking));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VariantError;
use crate::protocol::Protocol;

const NAMESPACE: &str = "protocols";
const SEGMENTS: usize = 4;

// ============================================================================
// Operation
// ============================================================================

/// Operation family of a transaction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Plain value transfer.
    Transfer,
    /// Delegate to a validator or staking provider.
    Staking,
    /// Undelegate.
    Unstaking,
    /// Withdraw rewards or unbonded funds.
    Withdrawing,
}

impl Operation {
    /// Returns the segment name used in variant tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Staking => "staking",
            Self::Unstaking => "unstaking",
            Self::Withdrawing => "withdrawing",
        }
    }

    /// Parses a variant-tag operation segment.
    ///
    /// `transfer` is not a tag operation and yields `None`.
    #[must_use]
    pub fn from_tag_segment(segment: &str) -> Option<Self> {
        match segment {
            "staking" => Some(Self::Staking),
            "unstaking" => Some(Self::Unstaking),
            "withdrawing" => Some(Self::Withdrawing),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// StakingProvider
// ============================================================================

/// Staking providers a task or input can be executed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakingProvider {
    /// The chain's own staking module.
    #[default]
    Native,
    /// Kiln.
    Kiln,
    /// Figment.
    Figment,
    /// Twinstake.
    Twinstake,
}

impl StakingProvider {
    /// All providers.
    pub const ALL: [Self; 4] = [Self::Native, Self::Kiln, Self::Figment, Self::Twinstake];

    /// Returns the provider name used in variant tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Kiln => "kiln",
            Self::Figment => "figment",
            Self::Twinstake => "twinstake",
        }
    }

    /// Returns `true` if `name` names a known provider.
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        name.parse::<Self>().is_ok()
    }
}

impl AsRef<str> for StakingProvider {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StakingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StakingProvider {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| VariantError::invalid_variant(s))
    }
}

// ============================================================================
// TxVariantInputType
// ============================================================================

/// Tag identifying the (protocol, operation, provider) triplet of an input.
///
/// Build tags with [`staking`](Self::staking), [`unstaking`](Self::unstaking)
/// or [`withdrawing`](Self::withdrawing). Values read back from storage go
/// through [`FromStr`] (validating) or [`from_raw`](Self::from_raw)
/// (validated later with [`validate`](Self::validate)).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TxVariantInputType(String);

impl TxVariantInputType {
    fn build(protocol: &Protocol, operation: Operation, provider: &str) -> Self {
        Self(format!(
            "{NAMESPACE}/{protocol}/{}/{provider}",
            operation.as_str()
        ))
    }

    /// Tag for a staking input.
    #[must_use]
    pub fn staking(protocol: &Protocol, provider: impl AsRef<str>) -> Self {
        Self::build(protocol, Operation::Staking, provider.as_ref())
    }

    /// Tag for an unstaking input.
    #[must_use]
    pub fn unstaking(protocol: &Protocol, provider: impl AsRef<str>) -> Self {
        Self::build(protocol, Operation::Unstaking, provider.as_ref())
    }

    /// Tag for a withdrawing input.
    #[must_use]
    pub fn withdrawing(protocol: &Protocol, provider: impl AsRef<str>) -> Self {
        Self::build(protocol, Operation::Withdrawing, provider.as_ref())
    }

    /// Wraps a persisted tag without validating it.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Checks that the tag has exactly four `/`-separated segments.
    ///
    /// Segment contents are not checked. [`InputKind::validate`] additionally
    /// checks the operation segment against the kind.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::InvalidVariant`] carrying the tag text if the
    /// segment count is not four.
    pub fn validate(&self) -> Result<(), VariantError> {
        if self.0.split('/').count() == SEGMENTS {
            Ok(())
        } else {
            Err(VariantError::invalid_variant(&self.0))
        }
    }

    /// Protocol segment. Only meaningful on a validated tag.
    #[must_use]
    pub fn blockchain(&self) -> Protocol {
        Protocol::from(self.segment(1))
    }

    /// Provider segment. Only meaningful on a validated tag.
    #[must_use]
    pub fn variant(&self) -> &str {
        self.segment(3)
    }

    /// Operation segment, if it names a known operation.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        Operation::from_tag_segment(self.segment(2))
    }

    /// Returns the wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segment(&self, index: usize) -> &str {
        self.0.split('/').nth(index).unwrap_or_default()
    }
}

impl FromStr for TxVariantInputType {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = Self::from_raw(s);
        tag.validate()?;
        Ok(tag)
    }
}

impl fmt::Display for TxVariantInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TxVariantInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxVariantInputType({})", self.0)
    }
}

impl Serialize for TxVariantInputType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TxVariantInputType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// InputKind
// ============================================================================

/// Capability marker of a transaction input.
///
/// Every staking-family kind carries exactly one variant tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "operation", content = "variant", rename_all = "lowercase")]
pub enum InputKind {
    /// Plain transfer input.
    #[default]
    Transfer,
    /// Staking input.
    Staking(TxVariantInputType),
    /// Unstaking input.
    Unstaking(TxVariantInputType),
    /// Withdrawing input.
    Withdrawing(TxVariantInputType),
}

impl InputKind {
    /// Staking kind for `protocol` through `provider`.
    #[must_use]
    pub fn staking(protocol: &Protocol, provider: StakingProvider) -> Self {
        Self::Staking(TxVariantInputType::staking(protocol, provider))
    }

    /// Unstaking kind for `protocol` through `provider`.
    #[must_use]
    pub fn unstaking(protocol: &Protocol, provider: StakingProvider) -> Self {
        Self::Unstaking(TxVariantInputType::unstaking(protocol, provider))
    }

    /// Withdrawing kind for `protocol` through `provider`.
    #[must_use]
    pub fn withdrawing(protocol: &Protocol, provider: StakingProvider) -> Self {
        Self::Withdrawing(TxVariantInputType::withdrawing(protocol, provider))
    }

    /// Kind matching `operation`, tagged for `protocol` and `provider`.
    #[must_use]
    pub fn for_operation(
        operation: Operation,
        protocol: &Protocol,
        provider: StakingProvider,
    ) -> Self {
        match operation {
            Operation::Transfer => Self::Transfer,
            Operation::Staking => Self::staking(protocol, provider),
            Operation::Unstaking => Self::unstaking(protocol, provider),
            Operation::Withdrawing => Self::withdrawing(protocol, provider),
        }
    }

    /// The operation family.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Transfer => Operation::Transfer,
            Self::Staking(_) => Operation::Staking,
            Self::Unstaking(_) => Operation::Unstaking,
            Self::Withdrawing(_) => Operation::Withdrawing,
        }
    }

    /// The variant tag, absent for plain transfers.
    #[must_use]
    pub const fn variant_tag(&self) -> Option<&TxVariantInputType> {
        match self {
            Self::Transfer => None,
            Self::Staking(tag) | Self::Unstaking(tag) | Self::Withdrawing(tag) => Some(tag),
        }
    }

    /// Validates the tag and checks that its operation segment agrees with
    /// the kind.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::InvalidVariant`] on a malformed tag or an
    /// operation mismatch.
    pub fn validate(&self) -> Result<(), VariantError> {
        let Some(tag) = self.variant_tag() else {
            return Ok(());
        };
        tag.validate()?;
        if tag.operation() == Some(self.operation()) {
            Ok(())
        } else {
            Err(VariantError::invalid_variant(tag.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_staking_variant_round_trip() {
        let tag = TxVariantInputType::staking(&Protocol::COSMOS, "native");
        assert!(tag.validate().is_ok());
        assert_eq!(tag.blockchain(), "cosmos");
        assert_eq!(tag.variant(), "native");
    }

    #[test]
    fn test_factories_layout() {
        assert_eq!(
            TxVariantInputType::unstaking(&Protocol::SOLANA, StakingProvider::Kiln).as_str(),
            "protocols/solana/unstaking/kiln"
        );
        assert_eq!(
            TxVariantInputType::withdrawing(&Protocol::EVM, StakingProvider::Figment).as_str(),
            "protocols/evm/withdrawing/figment"
        );
    }

    #[test]
    fn test_three_segments_rejected_with_tag_text() {
        let tag = TxVariantInputType::from_raw("protocols/cosmos/staking");
        let err = tag.validate().unwrap_err();
        assert!(err.to_string().contains("protocols/cosmos/staking"));
        assert_eq!(
            err.to_string(),
            "invalid input variant type: protocols/cosmos/staking"
        );
    }

    #[test]
    fn test_only_segment_count_is_checked() {
        assert!(TxVariantInputType::from_raw("protocols/cosmos/staking/native/x")
            .validate()
            .is_err());
        assert!("".parse::<TxVariantInputType>().is_err());

        for raw in [
            "protocols/cosmos/staking/",
            "x/cosmos/staking/native",
            "protocols/cosmos/lending/native",
            "///",
        ] {
            let tag: TxVariantInputType = raw.parse().unwrap();
            assert_eq!(tag.as_str(), raw);
        }

        let tag = TxVariantInputType::from_raw("protocols/cosmos/lending/native");
        assert_eq!(tag.operation(), None);
        assert_eq!(tag.blockchain(), "cosmos");
    }

    #[test]
    fn test_input_kind_requires_known_operation() {
        let kind = InputKind::Staking(TxVariantInputType::from_raw(
            "protocols/cosmos/lending/native",
        ));
        assert!(kind.validate().is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = "\"protocols/ton/withdrawing/native\"";
        let tag: TxVariantInputType = serde_json::from_str(json).unwrap();
        assert_eq!(tag.operation(), Some(Operation::Withdrawing));
        assert!(serde_json::from_str::<TxVariantInputType>("\"protocols/ton\"").is_err());
        let persisted: TxVariantInputType =
            serde_json::from_str("\"protocols/cosmos/staking/\"").unwrap();
        assert_eq!(persisted.variant(), "");
    }

    #[test]
    fn test_input_kind_marker() {
        let kind = InputKind::unstaking(&Protocol::COSMOS, StakingProvider::Native);
        assert_eq!(kind.operation(), Operation::Unstaking);
        assert_eq!(
            kind.variant_tag().map(TxVariantInputType::as_str),
            Some("protocols/cosmos/unstaking/native")
        );
        assert!(kind.validate().is_ok());
        assert!(InputKind::Transfer.variant_tag().is_none());
        assert!(InputKind::Transfer.validate().is_ok());
    }

    #[test]
    fn test_input_kind_rejects_mismatched_tag() {
        let kind = InputKind::Staking(TxVariantInputType::unstaking(&Protocol::COSMOS, "native"));
        assert!(kind.validate().is_err());
    }

    #[test]
    fn test_staking_provider() {
        assert!(StakingProvider::is_valid("twinstake"));
        assert!(!StakingProvider::is_valid("lido"));
        assert_eq!(StakingProvider::default(), StakingProvider::Native);
    }

    proptest! {
        #[test]
        fn prop_factory_tags_validate(
            protocol in "[a-z][a-z-]{0,12}",
            provider in "[a-z]{1,12}",
        ) {
            let protocol = Protocol::from(protocol.as_str());
            for tag in [
                TxVariantInputType::staking(&protocol, &provider),
                TxVariantInputType::unstaking(&protocol, &provider),
                TxVariantInputType::withdrawing(&protocol, &provider),
            ] {
                prop_assert!(tag.validate().is_ok());
                prop_assert_eq!(tag.blockchain(), protocol.clone());
                prop_assert_eq!(tag.variant(), provider.as_str());
                let reparsed: TxVariantInputType = tag.as_str().parse().unwrap();
                prop_assert_eq!(reparsed, tag);
            }
        }

        #[test]
        fn prop_wrong_segment_count_rejected(parts in proptest::collection::vec("[a-z]{1,6}", 0..8usize)) {
            prop_assume!(parts.len() != 4);
            let tag = TxVariantInputType::from_raw(parts.join("/"));
            prop_assert!(tag.validate().is_err());
        }
    }
}
