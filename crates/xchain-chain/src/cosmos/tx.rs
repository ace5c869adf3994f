//! Amino JSON transactions of cosmos SDK chains.
//!
//! Field order in every struct here is alphabetical: the sign bytes are the
//! compact JSON of [`StdSignDoc`] with sorted keys.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use xchain_core::error::BuildError;
use xchain_core::types::{SighashPayload, TxHash, TxSignature};

use crate::builder::Tx;

/// An amount of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Integer amount in the base unit.
    pub amount: String,
    /// Denomination.
    pub denom: String,
}

impl Coin {
    /// `amount` of `denom`.
    #[must_use]
    pub fn new(amount: impl ToString, denom: impl Into<String>) -> Self {
        Self {
            amount: amount.to_string(),
            denom: denom.into(),
        }
    }
}

/// Fee and gas limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// Fee coins.
    pub amount: Vec<Coin>,
    /// Gas limit.
    pub gas: String,
}

/// Messages in their amino JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AminoMsg {
    /// Bank transfer.
    #[serde(rename = "cosmos-sdk/MsgSend")]
    Send {
        /// Coins to move.
        amount: Vec<Coin>,
        /// Sender.
        from_address: String,
        /// Recipient.
        to_address: String,
    },
    /// Delegate to a validator.
    #[serde(rename = "cosmos-sdk/MsgDelegate")]
    Delegate {
        /// Amount to delegate.
        amount: Coin,
        /// Delegator account.
        delegator_address: String,
        /// Validator operator address.
        validator_address: String,
    },
    /// Undelegate from a validator.
    #[serde(rename = "cosmos-sdk/MsgUndelegate")]
    Undelegate {
        /// Amount to undelegate.
        amount: Coin,
        /// Delegator account.
        delegator_address: String,
        /// Validator operator address.
        validator_address: String,
    },
    /// Withdraw staking rewards.
    #[serde(rename = "cosmos-sdk/MsgWithdrawDelegationReward")]
    WithdrawReward {
        /// Delegator account.
        delegator_address: String,
        /// Validator operator address.
        validator_address: String,
    },
}

/// The document every signer signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignDoc {
    /// Account number of the signer.
    pub account_number: String,
    /// Chain id.
    pub chain_id: String,
    /// Fee.
    pub fee: StdFee,
    /// Memo.
    pub memo: String,
    /// Messages.
    pub msgs: Vec<AminoMsg>,
    /// Account sequence of the signer.
    pub sequence: String,
}

/// A typed public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    /// Amino type name.
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 compressed key.
    pub value: String,
}

/// A signature with its public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    /// Signer key.
    pub pub_key: PubKey,
    /// Base64 `r || s`.
    pub signature: String,
}

/// The broadcastable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    /// Fee.
    pub fee: StdFee,
    /// Memo.
    pub memo: String,
    /// Messages.
    pub msg: Vec<AminoMsg>,
    /// Signatures, one per signer.
    pub signatures: Vec<StdSignature>,
}

/// Digest applied to the sign bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignHashing {
    /// SHA-256, as on most cosmos chains.
    Sha256,
    /// KECCAK-256, as on ethermint chains.
    Keccak256,
}

impl SignHashing {
    fn digest(self, bytes: &[u8]) -> [u8; 32] {
        match self {
            Self::Sha256 => Sha256::digest(bytes).into(),
            Self::Keccak256 => Keccak256::digest(bytes).into(),
        }
    }

    const fn pub_key_type(self) -> &'static str {
        match self {
            Self::Sha256 => "tendermint/PubKeySecp256k1",
            Self::Keccak256 => "ethermint/PubKeyEthSecp256k1",
        }
    }
}

/// A cosmos transaction with a single signer.
#[derive(Debug, Clone)]
pub struct CosmosTx {
    sign_doc: StdSignDoc,
    hashing: SignHashing,
    public_key: Vec<u8>,
    signature: Option<[u8; 64]>,
}

impl CosmosTx {
    pub(crate) fn new(sign_doc: StdSignDoc, hashing: SignHashing, public_key: Vec<u8>) -> Self {
        Self {
            sign_doc,
            hashing,
            public_key,
            signature: None,
        }
    }

    /// The document that is signed.
    #[must_use]
    pub const fn sign_doc(&self) -> &StdSignDoc {
        &self.sign_doc
    }

    /// Canonical sign bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if JSON encoding fails.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, BuildError> {
        serde_json::to_vec(&self.sign_doc).map_err(|e| BuildError::encoding(e.to_string()))
    }

    fn std_tx(&self) -> StdTx {
        let signatures = self
            .signature
            .iter()
            .map(|signature| StdSignature {
                pub_key: PubKey {
                    key_type: self.hashing.pub_key_type().to_string(),
                    value: BASE64.encode(&self.public_key),
                },
                signature: BASE64.encode(signature),
            })
            .collect();
        StdTx {
            fee: self.sign_doc.fee.clone(),
            memo: self.sign_doc.memo.clone(),
            msg: self.sign_doc.msgs.clone(),
            signatures,
        }
    }
}

impl Tx for CosmosTx {
    /// Upper-case hex SHA-256 of the signed encoding; empty until signed.
    fn hash(&self) -> TxHash {
        if self.signature.is_none() {
            return TxHash::default();
        }
        match self.serialize() {
            Ok(bytes) => TxHash::new(hex::encode_upper(Sha256::digest(bytes))),
            Err(_) => TxHash::default(),
        }
    }

    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError> {
        let digest = self.hashing.digest(&self.sign_bytes()?);
        Ok(vec![SighashPayload::new(digest.to_vec())])
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError> {
        let [signature] = signatures else {
            return Err(BuildError::invalid_signature(format!(
                "expected 1 signature, got {}",
                signatures.len()
            )));
        };
        let rs: [u8; 64] = signature
            .as_bytes()
            .get(..64)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                BuildError::invalid_signature(format!(
                    "expected at least 64 bytes, got {}",
                    signature.len()
                ))
            })?;
        self.signature = Some(rs);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        serde_json::to_vec(&self.std_tx()).map_err(|e| BuildError::encoding(e.to_string()))
    }
}
