//! Bitcoin-family transaction.

use bitcoin::consensus::encode::serialize;
use bitcoin::hashes::{sha256d, Hash};
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::{Transaction, TxOut, Witness};
use xchain_core::error::BuildError;
use xchain_core::types::{SighashPayload, TxHash, TxSignature};
use xchain_crypto::Secp256k1Signature;

use crate::builder::Tx;

/// How the sender's outputs are unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendKind {
    /// Pay-to-pubkey-hash: signature and key in the script sig.
    Legacy,
    /// Pay-to-witness-pubkey-hash: signature and key in the witness.
    SegWit,
}

/// An unsigned or signed bitcoin-family transaction.
#[derive(Debug, Clone)]
pub struct BtcTx {
    transaction: Transaction,
    prevouts: Vec<TxOut>,
    spend: SpendKind,
    fork_id: Option<u32>,
    public_key: Vec<u8>,
}

impl BtcTx {
    pub(crate) fn new(
        transaction: Transaction,
        prevouts: Vec<TxOut>,
        spend: SpendKind,
        fork_id: Option<u32>,
        public_key: Vec<u8>,
    ) -> Self {
        Self {
            transaction,
            prevouts,
            spend,
            fork_id,
            public_key,
        }
    }

    /// The underlying transaction.
    #[must_use]
    pub const fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// How inputs are unlocked.
    #[must_use]
    pub const fn spend_kind(&self) -> SpendKind {
        self.spend
    }

    /// The sighash type committed to by every signature.
    #[must_use]
    pub fn sighash_type(&self) -> u32 {
        let all = EcdsaSighashType::All.to_u32();
        match self.fork_id {
            Some(fork_id) => all | 0x40 | (fork_id << 8),
            None => all,
        }
    }

    // BIP143 digest with the fork id folded into the hash type.
    fn forkid_sighash(&self, index: usize, prevout: &TxOut) -> [u8; 32] {
        let tx = &self.transaction;

        let mut prevouts = Vec::new();
        let mut sequences = Vec::new();
        for input in &tx.input {
            prevouts.extend(serialize(&input.previous_output));
            sequences.extend(serialize(&input.sequence));
        }
        let mut outputs = Vec::new();
        for output in &tx.output {
            outputs.extend(serialize(output));
        }

        let input = &tx.input[index];
        let mut preimage = Vec::with_capacity(200);
        preimage.extend(serialize(&tx.version));
        preimage.extend(sha256d::Hash::hash(&prevouts).to_byte_array());
        preimage.extend(sha256d::Hash::hash(&sequences).to_byte_array());
        preimage.extend(serialize(&input.previous_output));
        preimage.extend(serialize(&prevout.script_pubkey));
        preimage.extend(prevout.value.to_sat().to_le_bytes());
        preimage.extend(serialize(&input.sequence));
        preimage.extend(sha256d::Hash::hash(&outputs).to_byte_array());
        preimage.extend(serialize(&tx.lock_time));
        preimage.extend(self.sighash_type().to_le_bytes());

        sha256d::Hash::hash(&preimage).to_byte_array()
    }

    fn push_bytes(bytes: Vec<u8>) -> Result<PushBytesBuf, BuildError> {
        PushBytesBuf::try_from(bytes).map_err(|e| BuildError::encoding(e.to_string()))
    }
}

impl Tx for BtcTx {
    fn hash(&self) -> TxHash {
        TxHash::new(self.transaction.compute_txid().to_string())
    }

    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError> {
        let mut cache = SighashCache::new(&self.transaction);
        let mut payloads = Vec::with_capacity(self.prevouts.len());

        for (index, prevout) in self.prevouts.iter().enumerate() {
            let digest = match (self.fork_id, self.spend) {
                (Some(_), _) => self.forkid_sighash(index, prevout),
                (None, SpendKind::Legacy) => cache
                    .legacy_signature_hash(index, &prevout.script_pubkey, self.sighash_type())
                    .map_err(|e| BuildError::encoding(e.to_string()))?
                    .to_byte_array(),
                (None, SpendKind::SegWit) => cache
                    .p2wpkh_signature_hash(
                        index,
                        &prevout.script_pubkey,
                        prevout.value,
                        EcdsaSighashType::All,
                    )
                    .map_err(|e| BuildError::encoding(e.to_string()))?
                    .to_byte_array(),
            };
            payloads.push(SighashPayload::new(digest.to_vec()));
        }
        Ok(payloads)
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError> {
        if signatures.len() != self.transaction.input.len() {
            return Err(BuildError::invalid_signature(format!(
                "expected {} signatures, got {}",
                self.transaction.input.len(),
                signatures.len()
            )));
        }

        // Only the low byte of the hash type is appended to the signature.
        let hash_type_byte = (self.sighash_type() & 0xff) as u8;
        for (input, signature) in self.transaction.input.iter_mut().zip(signatures) {
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
            let mut script_sig = Secp256k1Signature::from_bytes_and_recovery_id(rs, 0)
                .to_der()
                .map_err(|e| BuildError::invalid_signature(e.to_string()))?;
            script_sig.push(hash_type_byte);

            match self.spend {
                SpendKind::Legacy => {
                    input.script_sig = Builder::new()
                        .push_slice(Self::push_bytes(script_sig)?)
                        .push_slice(Self::push_bytes(self.public_key.clone())?)
                        .into_script();
                }
                SpendKind::SegWit => {
                    input.witness = Witness::from_slice(&[script_sig, self.public_key.clone()]);
                }
            }
        }
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        Ok(serialize(&self.transaction))
    }
}
