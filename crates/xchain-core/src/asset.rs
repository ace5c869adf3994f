//! Native assets and asset configurations.
//!
//! [`NativeAsset`] identifies a specific coin and maps many-to-one onto a
//! [`Protocol`]. [`AssetConfig`] describes what a transfer moves: the chain's
//! native coin, a token, or a non-transfer task such as unstaking.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::protocol::Protocol;
use crate::variant::{Operation, StakingProvider};

// ============================================================================
// NativeAsset
// ============================================================================

/// A chain's native coin, identified by its ticker symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum NativeAsset {
    Btc,
    Bch,
    Doge,
    Ltc,
    Avax,
    Celo,
    Eth,
    Ethw,
    Matic,
    OptEth,
    ArbEth,
    Bera,
    Bnb,
    Ftm,
    Etc,
    EmRose,
    AurEth,
    Aca,
    Kar,
    Klay,
    Oas,
    Chz,
    Xdc,
    Chz2,
    Atom,
    Xpla,
    Inj,
    Hash,
    Lunc,
    Luna,
    Sei,
    Tia,
    Evmos,
    Sol,
    Trx,
    Ton,
}

impl NativeAsset {
    /// Every known native asset.
    pub const ALL: [Self; 36] = [
        Self::Btc,
        Self::Bch,
        Self::Doge,
        Self::Ltc,
        Self::Avax,
        Self::Celo,
        Self::Eth,
        Self::Ethw,
        Self::Matic,
        Self::OptEth,
        Self::ArbEth,
        Self::Bera,
        Self::Bnb,
        Self::Ftm,
        Self::Etc,
        Self::EmRose,
        Self::AurEth,
        Self::Aca,
        Self::Kar,
        Self::Klay,
        Self::Oas,
        Self::Chz,
        Self::Xdc,
        Self::Chz2,
        Self::Atom,
        Self::Xpla,
        Self::Inj,
        Self::Hash,
        Self::Lunc,
        Self::Luna,
        Self::Sei,
        Self::Tia,
        Self::Evmos,
        Self::Sol,
        Self::Trx,
        Self::Ton,
    ];

    /// Ticker symbol, as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Bch => "BCH",
            Self::Doge => "DOGE",
            Self::Ltc => "LTC",
            Self::Avax => "AVAX",
            Self::Celo => "CELO",
            Self::Eth => "ETH",
            Self::Ethw => "ETHW",
            Self::Matic => "MATIC",
            Self::OptEth => "OptETH",
            Self::ArbEth => "ArbETH",
            Self::Bera => "BERA",
            Self::Bnb => "BNB",
            Self::Ftm => "FTM",
            Self::Etc => "ETC",
            Self::EmRose => "EmROSE",
            Self::AurEth => "AurETH",
            Self::Aca => "ACA",
            Self::Kar => "KAR",
            Self::Klay => "KLAY",
            Self::Oas => "OAS",
            Self::Chz => "CHZ",
            Self::Xdc => "XDC",
            Self::Chz2 => "CHZ2",
            Self::Atom => "ATOM",
            Self::Xpla => "XPLA",
            Self::Inj => "INJ",
            Self::Hash => "HASH",
            Self::Lunc => "LUNC",
            Self::Luna => "LUNA",
            Self::Sei => "SEI",
            Self::Tia => "TIA",
            Self::Evmos => "EVMOS",
            Self::Sol => "SOL",
            Self::Trx => "TRX",
            Self::Ton => "TON",
        }
    }

    /// The protocol this asset's chain speaks.
    ///
    /// Returns `None` for an asset without a protocol, which makes the asset
    /// invalid for any registry lookup.
    #[must_use]
    pub fn protocol(self) -> Option<Protocol> {
        let protocol = match self {
            Self::Btc => Protocol::BTC,
            Self::Bch => Protocol::BTC_CASH,
            Self::Doge | Self::Ltc => Protocol::BTC_LEGACY,
            Self::Avax
            | Self::Celo
            | Self::Eth
            | Self::Ethw
            | Self::Matic
            | Self::OptEth
            | Self::ArbEth
            | Self::Bera => Protocol::EVM,
            Self::Bnb
            | Self::Ftm
            | Self::Etc
            | Self::EmRose
            | Self::AurEth
            | Self::Aca
            | Self::Kar
            | Self::Klay
            | Self::Oas
            | Self::Chz
            | Self::Xdc
            | Self::Chz2 => Protocol::EVM_LEGACY,
            Self::Atom
            | Self::Xpla
            | Self::Inj
            | Self::Hash
            | Self::Lunc
            | Self::Luna
            | Self::Sei
            | Self::Tia => Protocol::COSMOS,
            Self::Evmos => Protocol::EVMOS,
            Self::Sol => Protocol::SOLANA,
            Self::Trx => Protocol::TRON,
            Self::Ton => Protocol::TON,
        };
        Some(protocol)
    }

    /// Returns `true` if the asset maps onto a protocol.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.protocol().is_some()
    }
}

impl fmt::Display for NativeAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NativeAsset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|asset| asset.as_str() == s)
            .ok_or_else(|| ConfigError::invalid_value("chain", format!("unknown native asset {s}")))
    }
}

impl Serialize for NativeAsset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NativeAsset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Asset configuration
// ============================================================================

/// What a transfer moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetConfig {
    /// The chain's native coin.
    Native,
    /// A token issued on the chain.
    Token(TokenAssetConfig),
    /// A non-transfer operation, dispatched by the builder's task router.
    Task(TaskConfig),
}

impl AssetConfig {
    /// Identifier used in error messages: the token symbol or the task code.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Native => "native",
            Self::Token(token) => &token.symbol,
            Self::Task(task) => &task.code,
        }
    }

    /// Returns the token configuration, if this is a token.
    #[must_use]
    pub const fn as_token(&self) -> Option<&TokenAssetConfig> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Returns the task configuration, if this is a task.
    #[must_use]
    pub const fn as_task(&self) -> Option<&TaskConfig> {
        match self {
            Self::Task(task) => Some(task),
            _ => None,
        }
    }
}

/// A token on a chain (ERC-20, TRC-20, SPL mint, jetton master, IBC denom).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAssetConfig {
    /// Token symbol, e.g. `USDC`.
    pub symbol: String,
    /// Contract address, mint, or denom, in the chain's native encoding.
    pub contract: String,
    /// Token decimals.
    pub decimals: u8,
}

impl TokenAssetConfig {
    /// Create a token configuration.
    #[must_use]
    pub fn new(symbol: impl Into<String>, contract: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            contract: contract.into(),
            decimals,
        }
    }
}

/// Explicit operation of a task.
///
/// When absent on a [`TaskConfig`], the builder infers it from the task code
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOperation {
    /// Delegate funds to a validator.
    Stake,
    /// Undelegate funds from a validator.
    Unstake,
    /// Withdraw accumulated rewards.
    Withdraw,
}

impl TaskOperation {
    /// The operation family the task belongs to.
    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::Stake => Operation::Staking,
            Self::Unstake => Operation::Unstaking,
            Self::Withdraw => Operation::Withdrawing,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stake => "stake",
            Self::Unstake => "unstake",
            Self::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TaskOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-transfer chain operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Task code, e.g. `CosmosUndelegateOperator`. Doubles as the asset id.
    pub code: String,
    /// Chain the task runs on.
    pub chain: NativeAsset,
    /// Explicit operation; inferred from `code` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<TaskOperation>,
    /// Staking provider the task is executed through.
    #[serde(default)]
    pub provider: StakingProvider,
    /// Task parameters, consulted before the chain's default parameters.
    #[serde(default)]
    pub default_params: BTreeMap<String, String>,
}

impl TaskConfig {
    /// Create a task with no explicit operation and no parameters.
    #[must_use]
    pub fn new(code: impl Into<String>, chain: NativeAsset) -> Self {
        Self {
            code: code.into(),
            chain,
            operation: None,
            provider: StakingProvider::Native,
            default_params: BTreeMap::new(),
        }
    }

    /// Set the explicit operation.
    #[must_use]
    pub fn with_operation(mut self, operation: TaskOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Add a task parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }

    /// Look up a task parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.default_params.get(key).map(String::as_str)
    }
}
