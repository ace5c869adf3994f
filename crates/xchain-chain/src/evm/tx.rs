//! EIP-1559 and EIP-155 transactions.

use alloy_primitives::{keccak256, Address, Bytes, U256};
use alloy_rlp::{Encodable, Header};
use xchain_core::error::BuildError;
use xchain_core::types::{SighashPayload, TxHash, TxSignature};

use crate::builder::Tx;

const EIP1559_TX_TYPE: u8 = 0x02;

/// How fees are expressed on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeeMode {
    /// Type 2 transaction with fee cap and priority tip.
    #[default]
    Eip1559,
    /// Untyped transaction with a single gas price, replay-protected by
    /// chain id.
    Legacy,
}

/// Unsigned transaction fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTxFields {
    /// Wire format.
    pub fee_mode: FeeMode,
    /// Chain id.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Max fee per gas, or gas price in legacy mode.
    pub max_fee_per_gas: u128,
    /// Priority fee per gas; unused in legacy mode.
    pub max_priority_fee_per_gas: u128,
    /// Recipient or token contract.
    pub to: Address,
    /// Wei transferred.
    pub value: U256,
    /// Calldata.
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecoverableSignature {
    y_parity: u8,
    r: U256,
    s: U256,
}

#[derive(Debug, Clone)]
struct Inner {
    fields: EvmTxFields,
    signature: Option<RecoverableSignature>,
}

/// An EVM transaction.
///
/// The default value is an empty transaction: its hash is empty and every
/// other operation fails with [`BuildError::NotInitialized`].
#[derive(Debug, Clone, Default)]
pub struct EvmTx {
    inner: Option<Inner>,
}

/// An empty RLP list, used for the access list.
struct EmptyList;

impl Encodable for EmptyList {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        Header {
            list: true,
            payload_length: 0,
        }
        .encode(out);
    }

    fn length(&self) -> usize {
        1
    }
}

fn rlp_list(items: &[&dyn Encodable]) -> Vec<u8> {
    let payload_length = items.iter().map(|item| item.length()).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for item in items {
        item.encode(&mut out);
    }
    out
}

impl EvmTxFields {
    fn encode(&self, signature: Option<&RecoverableSignature>) -> Vec<u8> {
        let zero = 0u64;
        let v = signature.map(|sig| match self.fee_mode {
            FeeMode::Eip1559 => u128::from(sig.y_parity),
            FeeMode::Legacy => u128::from(sig.y_parity) + 35 + 2 * u128::from(self.chain_id),
        });
        let mut items: Vec<&dyn Encodable> = Vec::with_capacity(12);

        if self.fee_mode == FeeMode::Eip1559 {
            items.extend([
                &self.chain_id as &dyn Encodable,
                &self.nonce,
                &self.max_priority_fee_per_gas,
            ]);
        } else {
            items.push(&self.nonce);
        }
        items.extend([
            &self.max_fee_per_gas as &dyn Encodable,
            &self.gas_limit,
            &self.to,
            &self.value,
            &self.data,
        ]);
        if self.fee_mode == FeeMode::Eip1559 {
            items.push(&EmptyList);
        }

        match (signature, &v) {
            (Some(sig), Some(v)) => items.extend([v as &dyn Encodable, &sig.r, &sig.s]),
            // EIP-155 signing payload
            _ if self.fee_mode == FeeMode::Legacy => {
                items.extend([&self.chain_id as &dyn Encodable, &zero, &zero]);
            }
            _ => {}
        }

        let list = rlp_list(&items);
        match self.fee_mode {
            FeeMode::Eip1559 => {
                let mut out = Vec::with_capacity(list.len() + 1);
                out.push(EIP1559_TX_TYPE);
                out.extend(list);
                out
            }
            FeeMode::Legacy => list,
        }
    }
}

impl EvmTx {
    /// Wrap unsigned fields.
    #[must_use]
    pub fn new(fields: EvmTxFields) -> Self {
        Self {
            inner: Some(Inner {
                fields,
                signature: None,
            }),
        }
    }

    /// The unsigned fields, if initialized.
    #[must_use]
    pub fn fields(&self) -> Option<&EvmTxFields> {
        self.inner.as_ref().map(|inner| &inner.fields)
    }

    fn inner(&self) -> Result<&Inner, BuildError> {
        self.inner.as_ref().ok_or(BuildError::NotInitialized)
    }
}

impl Tx for EvmTx {
    /// `0x` KECCAK-256 of the signed encoding; empty until signed.
    fn hash(&self) -> TxHash {
        match &self.inner {
            Some(Inner {
                fields,
                signature: Some(sig),
            }) => TxHash::new(format!("0x{}", hex::encode(keccak256(fields.encode(Some(sig)))))),
            _ => TxHash::default(),
        }
    }

    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError> {
        let inner = self.inner()?;
        let digest = keccak256(inner.fields.encode(None));
        Ok(vec![SighashPayload::new(digest.to_vec())])
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError> {
        let inner = self.inner.as_mut().ok_or(BuildError::NotInitialized)?;
        let [signature] = signatures else {
            return Err(BuildError::invalid_signature(format!(
                "expected 1 signature, got {}",
                signatures.len()
            )));
        };
        let bytes = signature.as_bytes();
        if bytes.len() != 65 {
            return Err(BuildError::invalid_signature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let y_parity = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            v => {
                return Err(BuildError::invalid_signature(format!(
                    "invalid recovery id {v}"
                )))
            }
        };
        inner.signature = Some(RecoverableSignature {
            y_parity,
            r: U256::from_be_slice(&bytes[..32]),
            s: U256::from_be_slice(&bytes[32..64]),
        });
        Ok(())
    }

    /// The signed encoding, or the unsigned one before signing.
    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let inner = self.inner()?;
        Ok(inner.fields.encode(inner.signature.as_ref()))
    }
}
