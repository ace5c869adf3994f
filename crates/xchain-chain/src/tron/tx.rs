//! Tron transactions: protobuf `raw_data` signed over its SHA-256.

use prost::Message as _;
use sha2::{Digest, Sha256};
use xchain_core::error::BuildError;
use xchain_core::types::{SighashPayload, TxHash, TxSignature};

use super::proto::{Raw, Transaction};
use crate::builder::Tx;

/// A Tron transaction.
#[derive(Debug, Clone)]
pub struct TronTx {
    raw: Raw,
    signature: Option<Vec<u8>>,
}

impl TronTx {
    /// Wrap `raw_data`.
    #[must_use]
    pub const fn new(raw: Raw) -> Self {
        Self {
            raw,
            signature: None,
        }
    }

    /// The raw data.
    #[must_use]
    pub const fn raw(&self) -> &Raw {
        &self.raw
    }

    /// SHA-256 of the encoded raw data.
    #[must_use]
    pub fn txid(&self) -> [u8; 32] {
        Sha256::digest(self.raw.encode_to_vec()).into()
    }
}

impl Tx for TronTx {
    /// Hex txid; available before signing.
    fn hash(&self) -> TxHash {
        TxHash::new(hex::encode(self.txid()))
    }

    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError> {
        Ok(vec![SighashPayload::new(self.txid().to_vec())])
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError> {
        let [signature] = signatures else {
            return Err(BuildError::invalid_signature(format!(
                "expected 1 signature, got {}",
                signatures.len()
            )));
        };
        let mut bytes = signature.as_bytes().to_vec();
        if bytes.len() != 65 {
            return Err(BuildError::invalid_signature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[64] < 27 {
            bytes[64] += 27;
        }
        self.signature = Some(bytes);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let tx = Transaction {
            raw_data: Some(self.raw.clone()),
            signature: self.signature.iter().cloned().collect(),
        };
        Ok(tx.encode_to_vec())
    }
}
