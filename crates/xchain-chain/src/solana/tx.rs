//! Legacy transaction messages.
//!
//! Accounts are ordered writable signers, read-only signers, writable
//! non-signers, read-only non-signers, with the fee payer first.

use xchain_core::error::BuildError;
use xchain_core::types::{SighashPayload, TxHash, TxSignature};

use super::address::Pubkey;
use crate::builder::Tx;

/// An account referenced by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    /// Account key.
    pub pubkey: Pubkey,
    /// Must sign the transaction.
    pub is_signer: bool,
    /// May be modified.
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    #[must_use]
    pub const fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    #[must_use]
    pub const fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Program to invoke.
    pub program_id: Pubkey,
    /// Accounts passed to the program.
    pub accounts: Vec<AccountMeta>,
    /// Instruction data.
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledInstruction {
    program_id_index: u8,
    accounts: Vec<u8>,
    data: Vec<u8>,
}

/// A compiled legacy message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: [u8; 3],
    account_keys: Vec<Pubkey>,
    recent_blockhash: Pubkey,
    instructions: Vec<CompiledInstruction>,
}

fn push_compact_u16(out: &mut Vec<u8>, value: usize) -> Result<(), BuildError> {
    let mut rem = u16::try_from(value)
        .map_err(|_| BuildError::encoding(format!("length {value} exceeds u16")))?;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            return Ok(());
        }
        byte |= 0x80;
        out.push(byte);
    }
}

impl Message {
    /// Compile `instructions` with `payer` as fee payer.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if more than 256 accounts are
    /// referenced.
    pub fn compile(
        payer: &Pubkey,
        instructions: &[Instruction],
        recent_blockhash: Pubkey,
    ) -> Result<Self, BuildError> {
        let mut metas: Vec<AccountMeta> = vec![AccountMeta::writable(*payer, true)];
        let mut merge = |meta: AccountMeta| {
            if let Some(existing) = metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                existing.is_signer |= meta.is_signer;
                existing.is_writable |= meta.is_writable;
            } else {
                metas.push(meta);
            }
        };
        for instruction in instructions {
            for meta in &instruction.accounts {
                merge(*meta);
            }
            merge(AccountMeta::readonly(instruction.program_id, false));
        }

        // Stable sort keeps the payer first among writable signers.
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));
        let count = |signer: bool, writable: bool| {
            metas
                .iter()
                .filter(|m| m.is_signer == signer && m.is_writable == writable)
                .count()
        };
        let to_u8 = |n: usize| {
            u8::try_from(n).map_err(|_| BuildError::encoding(format!("{n} accounts exceed 256")))
        };
        let signers = metas.iter().filter(|m| m.is_signer).count();
        let header = [to_u8(signers)?, to_u8(count(true, false))?, to_u8(count(false, false))?];

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, BuildError> {
            let index = account_keys
                .iter()
                .position(|k| k == key)
                .ok_or_else(|| BuildError::encoding("instruction account missing from message"))?;
            to_u8(index)
        };

        let compiled = instructions
            .iter()
            .map(|instruction| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&instruction.program_id)?,
                    accounts: instruction
                        .accounts
                        .iter()
                        .map(|m| index_of(&m.pubkey))
                        .collect::<Result<_, BuildError>>()?,
                    data: instruction.data.clone(),
                })
            })
            .collect::<Result<_, BuildError>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// Number of required signatures.
    #[must_use]
    pub const fn num_required_signatures(&self) -> u8 {
        self.header[0]
    }

    /// Account keys in message order.
    #[must_use]
    pub fn account_keys(&self) -> &[Pubkey] {
        &self.account_keys
    }

    /// Wire encoding; this is what signers sign.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if a length does not fit.
    pub fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let mut out = Vec::with_capacity(128 + 32 * self.account_keys.len());
        out.extend_from_slice(&self.header);
        push_compact_u16(&mut out, self.account_keys.len())?;
        for key in &self.account_keys {
            out.extend_from_slice(key);
        }
        out.extend_from_slice(&self.recent_blockhash);
        push_compact_u16(&mut out, self.instructions.len())?;
        for instruction in &self.instructions {
            out.push(instruction.program_id_index);
            push_compact_u16(&mut out, instruction.accounts.len())?;
            out.extend_from_slice(&instruction.accounts);
            push_compact_u16(&mut out, instruction.data.len())?;
            out.extend_from_slice(&instruction.data);
        }
        Ok(out)
    }
}

/// A solana transaction.
#[derive(Debug, Clone)]
pub struct SolanaTx {
    message: Message,
    signatures: Vec<[u8; 64]>,
}

impl SolanaTx {
    /// Wrap a compiled message.
    #[must_use]
    pub const fn new(message: Message) -> Self {
        Self {
            message,
            signatures: Vec::new(),
        }
    }

    /// The message.
    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.message
    }
}

impl Tx for SolanaTx {
    /// Base58 of the fee payer's signature; empty until signed.
    fn hash(&self) -> TxHash {
        self.signatures
            .first()
            .map(|sig| TxHash::new(bs58::encode(sig).into_string()))
            .unwrap_or_default()
    }

    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError> {
        let message = self.message.serialize()?;
        Ok((0..self.message.num_required_signatures())
            .map(|_| SighashPayload::new(message.clone()))
            .collect())
    }

    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError> {
        let required = usize::from(self.message.num_required_signatures());
        if signatures.len() != required {
            return Err(BuildError::invalid_signature(format!(
                "expected {required} signatures, got {}",
                signatures.len()
            )));
        }
        self.signatures = signatures
            .iter()
            .map(|sig| {
                <[u8; 64]>::try_from(sig.as_bytes()).map_err(|_| {
                    BuildError::invalid_signature(format!("expected 64 bytes, got {}", sig.len()))
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Signatures (zeroed before signing) followed by the message.
    fn serialize(&self) -> Result<Vec<u8>, BuildError> {
        let required = usize::from(self.message.num_required_signatures());
        let mut out = Vec::new();
        push_compact_u16(&mut out, required)?;
        for index in 0..required {
            out.extend_from_slice(self.signatures.get(index).unwrap_or(&[0u8; 64]));
        }
        out.extend(self.message.serialize()?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_compact_u16() {
        let cases: [(usize, &[u8]); 5] = [
            (0, &[0x00]),
            (0x7f, &[0x7f]),
            (0x80, &[0x80, 0x01]),
            (0x3fff, &[0xff, 0x7f]),
            (0x4000, &[0x80, 0x80, 0x01]),
        ];
        for (value, expected) in cases {
            let mut out = Vec::new();
            push_compact_u16(&mut out, value).unwrap();
            assert_eq!(out, expected, "value {value:#x}");
        }
        assert!(push_compact_u16(&mut Vec::new(), 0x1_0000).is_err());
    }

    #[test]
    fn test_compile_orders_and_dedupes_accounts() {
        let payer = [1u8; 32];
        let to = [2u8; 32];
        let program = [0u8; 32];
        let instruction = Instruction {
            program_id: program,
            accounts: vec![AccountMeta::writable(payer, true), AccountMeta::writable(to, false)],
            data: vec![9],
        };
        let message = Message::compile(&payer, &[instruction], [3u8; 32]).unwrap();
        assert_eq!(message.header, [1, 0, 1]);
        assert_eq!(message.account_keys(), &[payer, to, program]);
        assert_eq!(message.instructions[0].program_id_index, 2);
        assert_eq!(message.instructions[0].accounts, vec![0, 1]);
    }

    #[test]
    fn test_signing() {
        let payer = [1u8; 32];
        let message = Message::compile(&payer, &[], [3u8; 32]).unwrap();
        let mut tx = SolanaTx::new(message);
        assert!(tx.hash().is_empty());
        assert_eq!(tx.serialize().unwrap()[1..65], [0u8; 64]);

        assert!(tx.add_signatures(&[TxSignature::new(vec![1u8; 63])]).is_err());
        tx.add_signatures(&[TxSignature::new(vec![1u8; 64])]).unwrap();
        assert_eq!(tx.hash().as_str(), bs58::encode([1u8; 64]).into_string());
        assert_eq!(tx.serialize().unwrap()[1..65], [1u8; 64]);
    }
}
