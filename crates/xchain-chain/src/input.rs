//! Chain state handed to a [`TxBuilder`](crate::builder::TxBuilder).
//!
//! Fetching this state is a client's job; builders only consume it. A
//! [`TxInput`] pairs the per-family state with an [`InputKind`] that marks
//! which operation the input was prepared for.

use serde::{Deserialize, Serialize};
use xchain_core::error::DefectError;
use xchain_core::variant::InputKind;

use crate::btc::BtcInput;
use crate::cosmos::CosmosInput;
use crate::evm::EvmInput;
use crate::solana::SolanaInput;
use crate::ton::TonInput;
use crate::tron::TronInput;

/// Per-family chain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ChainInput {
    /// UTXO chains (btc, btc-cash, btc-legacy).
    Btc(BtcInput),
    /// Cosmos SDK chains (cosmos, evmos).
    Cosmos(CosmosInput),
    /// EVM chains (evm, evm-legacy).
    Evm(EvmInput),
    /// Solana.
    Solana(SolanaInput),
    /// Tron.
    Tron(TronInput),
    /// TON.
    Ton(TonInput),
}

impl ChainInput {
    /// Family name used in error messages.
    #[must_use]
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Btc(_) => "btc",
            Self::Cosmos(_) => "cosmos",
            Self::Evm(_) => "evm",
            Self::Solana(_) => "solana",
            Self::Tron(_) => "tron",
            Self::Ton(_) => "ton",
        }
    }
}

/// Chain state plus the operation it was prepared for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Operation marker; plain transfers carry no variant tag.
    #[serde(default)]
    pub kind: InputKind,
    /// Family-specific state.
    pub chain: ChainInput,
}

macro_rules! family_accessor {
    ($name:ident, $variant:ident, $ty:ty, $family:literal) => {
        #[doc = concat!("The ", $family, " state.")]
        ///
        /// # Errors
        ///
        /// Returns [`DefectError::UnexpectedInput`] for any other family.
        pub fn $name(&self) -> Result<&$ty, DefectError> {
            match &self.chain {
                ChainInput::$variant(input) => Ok(input),
                other => Err(DefectError::unexpected_input(
                    concat!($family, " input"),
                    format!("{} input", other.family()),
                )),
            }
        }
    };
}

impl TxInput {
    /// Plain transfer input.
    #[must_use]
    pub const fn new(chain: ChainInput) -> Self {
        Self {
            kind: InputKind::Transfer,
            chain,
        }
    }

    /// Mark the input for a staking-family operation.
    #[must_use]
    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    family_accessor!(as_btc, Btc, BtcInput, "btc");
    family_accessor!(as_cosmos, Cosmos, CosmosInput, "cosmos");
    family_accessor!(as_evm, Evm, EvmInput, "evm");
    family_accessor!(as_solana, Solana, SolanaInput, "solana");
    family_accessor!(as_tron, Tron, TronInput, "tron");
    family_accessor!(as_ton, Ton, TonInput, "ton");
}

impl From<ChainInput> for TxInput {
    fn from(chain: ChainInput) -> Self {
        Self::new(chain)
    }
}
