//! TON wallet transactions: an external message whose body the owner signs.

use std::sync::Arc;

use xchain_core::error::BuildError;
use xchain_core::types::{SighashPayload, TxHash, TxSignature};

use super::address::TonAddress;
use super::cell::{to_boc, Cell};
use super::wallet::{external_message, signed_body};
use crate::builder::Tx;

/// An unsigned or signed wallet transaction.
#[derive(Debug, Clone)]
pub struct TonTx {
    wallet: TonAddress,
    body: Arc<Cell>,
    signature: Option<[u8; 64]>,
}

impl TonTx {
    /// Transaction sending the signing `body` to `wallet`.
    #[must_use]
    pub fn new(wallet: TonAddress, body: Cell) -> Self {
        Self {
            wallet,
            body: Arc::new(body),
            signature: None,
        }
    }

    /// The wallet the message is addressed to.
    #[must_use]
    pub const fn wallet(&self) -> &TonAddress {
        &self.wallet
    }

    /// The body the owner signs.
    #[must_use]
    pub fn body(&self) -> &Cell {
        &self.body
    }

    fn message(&self, signature: &[u8; 64]) -> Result<Cell, BuildError> {
        external_message(&self.wallet, signed_body(signature, &self.body)?)
    }
}

impl Tx for TonTx {
    /// Hex hash of the external message; empty until signed.
    fn hash(&self) -> TxHash {
        self.signature
            .as_ref()
            .and_then(|signature| self.message(signature).ok())
            .map(|message| TxHash::new(hex::encode(message.hash())))
            .unwrap_or_default()
    }

    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError> {
        Ok(vec![SighashPayload::new(self.body.hash().to_vec())])
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError> {
        let [signature] = signatures else {
            return Err(BuildError::invalid_signature(format!(
                "expected 1 signature, got {}",
                signatures.len()
            )));
        };
        let bytes: [u8; 64] = signature.as_bytes().try_into().map_err(|_| {
            BuildError::invalid_signature(format!("expected 64 bytes, got {}", signature.len()))
        })?;
        self.signature = Some(bytes);
        Ok(())
    }

    /// Bag of cells of the external message; the signature is zeroed
    /// until one is added.
    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let signature = self.signature.unwrap_or([0u8; 64]);
        to_boc(&self.message(&signature)?)
    }
}
