//! Solana transaction builder: system transfers and SPL `TransferChecked`
//! between associated token accounts, with an optional memo.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use xchain_core::config::ChainConfig;
use xchain_core::error::BuildError;
use xchain_core::types::TransferArgs;
use xchain_core::variant::Operation;

use super::address::{
    associated_token_address, parse_pubkey, Pubkey, MEMO_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use super::tx::{AccountMeta, Instruction, Message, SolanaTx};
use crate::builder::{amount_u64, check_input_kind, require_token, Tx, TxBuilder};
use crate::input::TxInput;

const SYSTEM_TRANSFER: u32 = 2;
const TOKEN_TRANSFER_CHECKED: u8 = 12;

/// Chain state fetched before building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaInput {
    /// Recent blockhash, base58.
    pub recent_blockhash: String,
    /// Token program owning the mint; the SPL token program when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_program: Option<String>,
}

/// Transaction builder for solana.
#[derive(Debug, Clone)]
pub struct SolanaTxBuilder {
    config: Arc<ChainConfig>,
}

impl SolanaTxBuilder {
    /// Builder for `config`.
    #[must_use]
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            config: Arc::new(config.clone()),
        }
    }

    fn build(
        &self,
        payer: &Pubkey,
        input: &SolanaInput,
        mut instructions: Vec<Instruction>,
        memo: Option<&str>,
    ) -> Result<Box<dyn Tx>, BuildError> {
        if let Some(memo) = memo.filter(|m| !m.is_empty()) {
            instructions.push(Instruction {
                program_id: parse_pubkey(MEMO_PROGRAM_ID)?,
                accounts: Vec::new(),
                data: memo.as_bytes().to_vec(),
            });
        }
        let blockhash = parse_pubkey(&input.recent_blockhash)
            .map_err(|e| BuildError::invalid_input(format!("recent_blockhash: {e}")))?;
        let message = Message::compile(payer, &instructions, blockhash)?;
        tracing::debug!(
            chain = self.config.id(),
            instructions = instructions.len(),
            "built solana transaction"
        );
        Ok(Box::new(SolanaTx::new(message)))
    }
}

/// System program transfer of `lamports`.
///
/// # Errors
///
/// Returns [`BuildError`] only if the system program id is malformed.
pub fn system_transfer(from: Pubkey, to: Pubkey, lamports: u64) -> Result<Instruction, BuildError> {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    Ok(Instruction {
        program_id: parse_pubkey(SYSTEM_PROGRAM_ID)?,
        accounts: vec![AccountMeta::writable(from, true), AccountMeta::writable(to, false)],
        data,
    })
}

/// SPL `TransferChecked` between token accounts.
#[must_use]
pub fn token_transfer_checked(
    token_program: Pubkey,
    source: Pubkey,
    mint: Pubkey,
    destination: Pubkey,
    owner: Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let mut data = Vec::with_capacity(10);
    data.push(TOKEN_TRANSFER_CHECKED);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);
    Instruction {
        program_id: token_program,
        accounts: vec![
            AccountMeta::writable(source, false),
            AccountMeta::readonly(mint, false),
            AccountMeta::writable(destination, false),
            AccountMeta::readonly(owner, true),
        ],
        data,
    }
}

impl TxBuilder for SolanaTxBuilder {
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let solana = input.as_solana()?;
        let from = parse_pubkey(args.from().as_str())?;
        let to = parse_pubkey(args.to().as_str())?;
        let transfer = system_transfer(from, to, amount_u64(args.amount())?)?;
        self.build(&from, solana, vec![transfer], args.memo())
    }

    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let solana = input.as_solana()?;
        let token = require_token(args)?;
        let from = parse_pubkey(args.from().as_str())?;
        let to = parse_pubkey(args.to().as_str())?;
        let mint = parse_pubkey(&token.contract)?;
        let token_program =
            parse_pubkey(solana.token_program.as_deref().unwrap_or(TOKEN_PROGRAM_ID))?;

        let source = associated_token_address(&from, &mint, &token_program)?;
        let destination = associated_token_address(&to, &mint, &token_program)?;
        let transfer = token_transfer_checked(
            token_program,
            source,
            mint,
            destination,
            from,
            amount_u64(args.amount())?,
            token.decimals,
        );
        self.build(&from, solana, vec![transfer], args.memo())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::input::ChainInput;
    use xchain_core::asset::{AssetConfig, NativeAsset, TokenAssetConfig};
    use xchain_core::types::Address;
    use xchain_core::U256;

    fn key(byte: u8) -> String {
        bs58::encode([byte; 32]).into_string()
    }

    fn input() -> TxInput {
        TxInput::new(ChainInput::Solana(SolanaInput {
            recent_blockhash: key(9),
            token_program: None,
        }))
    }

    fn builder() -> SolanaTxBuilder {
        SolanaTxBuilder::new(&ChainConfig::new(NativeAsset::Sol))
    }

    #[test]
    fn test_native_transfer_message() {
        let args = TransferArgs::new(Address::new(key(1)), Address::new(key(2)), U256::from(5_000u64));
        let tx = builder().new_transfer(&args, &input()).unwrap();
        let message = tx.sighashes().unwrap().remove(0);
        let bytes = message.as_bytes();

        assert_eq!(&bytes[..3], &[1, 0, 1]);
        assert_eq!(bytes[3], 3);
        // header, key count, 3 keys, blockhash, instruction count
        let ix = 3 + 1 + 96 + 32 + 1;
        assert_eq!(bytes[ix], 2);
        assert_eq!(&bytes[ix + 1..ix + 4], &[2, 0, 1]);
        assert_eq!(bytes[ix + 4], 12);
        assert_eq!(&bytes[ix + 5..ix + 9], &2u32.to_le_bytes());
        assert_eq!(&bytes[ix + 9..ix + 17], &5_000u64.to_le_bytes());
    }

    #[test]
    fn test_memo_adds_instruction() {
        let args = TransferArgs::new(Address::new(key(1)), Address::new(key(2)), U256::from(1u64))
            .with_memo("hello");
        let tx = builder().new_transfer(&args, &input()).unwrap();
        let message = tx.sighashes().unwrap().remove(0);
        assert!(message.as_bytes().ends_with(b"\x05hello"));
    }

    #[test]
    fn test_token_transfer_checked() {
        let token = TokenAssetConfig::new("USDC", key(5), 6);
        let args = TransferArgs::new(Address::new(key(1)), Address::new(key(2)), U256::from(42u64))
            .with_asset(AssetConfig::Token(token));
        let tx = builder().new_transfer(&args, &input()).unwrap();
        let bytes = tx.sighashes().unwrap().remove(0);
        let mut data = vec![TOKEN_TRANSFER_CHECKED];
        data.extend_from_slice(&42u64.to_le_bytes());
        data.push(6);
        assert!(bytes.as_bytes().ends_with(&data));
    }

    #[test]
    fn test_bad_blockhash() {
        let args = TransferArgs::new(Address::new(key(1)), Address::new(key(2)), U256::from(1u64));
        let input = TxInput::new(ChainInput::Solana(SolanaInput::default()));
        assert!(matches!(
            builder().new_transfer(&args, &input),
            Err(BuildError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_amount_overflow() {
        let args = TransferArgs::new(Address::new(key(1)), Address::new(key(2)), U256::MAX);
        assert!(builder().new_transfer(&args, &input()).is_err());
    }
}
