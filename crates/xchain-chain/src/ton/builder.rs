//! TON transaction builder: wallet v4r2 transfers of TON and jettons.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use xchain_core::config::ChainConfig;
use xchain_core::error::{BuildError, ConfigError};
use xchain_core::types::TransferArgs;
use xchain_core::variant::Operation;
use xchain_core::U256;

use super::address::{workchain, TonAddress};
use super::cell::Cell;
use super::message::{comment_body, internal_message, JettonTransfer};
use super::tx::TonTx;
use super::wallet::{signing_body, DEFAULT_WALLET_ID, SEND_MODE_DEFAULT};
use crate::builder::{check_input_kind, require_token, Tx, TxBuilder};
use crate::input::TxInput;

/// TON attached to a jetton transfer to pay for its execution, nanotons.
pub const JETTON_TRANSFER_TON: u128 = 50_000_000;

/// TON forwarded to the jetton recipient with the transfer notification.
pub const JETTON_FORWARD_TON: u128 = 1;

/// Wallet state fetched before building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonInput {
    /// Current wallet seqno.
    pub seqno: u32,
    /// Unix time after which the message is rejected.
    pub valid_until: u32,
    /// The sender's jetton wallet for the transferred token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_wallet: Option<String>,
    /// Query id of jetton transfers.
    #[serde(default)]
    pub query_id: u64,
}

/// Transaction builder for ton.
#[derive(Debug, Clone)]
pub struct TonTxBuilder {
    config: Arc<ChainConfig>,
    wallet_id: u32,
}

fn parse(address: &str) -> Result<TonAddress, BuildError> {
    Ok(address.parse::<TonAddress>()?)
}

fn amount_u128(amount: U256) -> Result<u128, BuildError> {
    u128::try_from(amount)
        .map_err(|_| BuildError::invalid_input(format!("amount {amount} exceeds u128")))
}

fn memo_body(memo: Option<&str>) -> Result<Option<Cell>, BuildError> {
    memo.filter(|m| !m.is_empty()).map(comment_body).transpose()
}

impl TonTxBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] on a malformed workchain.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        let workchain = workchain(config)?;
        Ok(Self {
            config: Arc::new(config.clone()),
            wallet_id: DEFAULT_WALLET_ID.wrapping_add(workchain as u32),
        })
    }

    fn finish(
        &self,
        wallet: TonAddress,
        input: &TonInput,
        message: Cell,
    ) -> Result<Box<dyn Tx>, BuildError> {
        let body = signing_body(
            self.wallet_id,
            input.valid_until,
            input.seqno,
            &[(SEND_MODE_DEFAULT, Arc::new(message))],
        )?;
        tracing::debug!(
            chain = self.config.id(),
            wallet = %wallet,
            seqno = input.seqno,
            "built ton transaction"
        );
        Ok(Box::new(TonTx::new(wallet, body)))
    }
}

impl TxBuilder for TonTxBuilder {
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let ton = input.as_ton()?;
        let from = parse(args.from().as_str())?;
        let to = parse(args.to().as_str())?;
        let message = internal_message(
            &to,
            to.bounceable,
            amount_u128(args.amount())?,
            memo_body(args.memo())?,
        )?;
        self.finish(from, ton, message)
    }

    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let ton = input.as_ton()?;
        let token = require_token(args)?;
        let token_wallet = ton.token_wallet.as_deref().ok_or_else(|| {
            BuildError::invalid_input(format!("token_wallet is required for {}", token.symbol))
        })?;

        let from = parse(args.from().as_str())?;
        let transfer = JettonTransfer {
            query_id: ton.query_id,
            amount: amount_u128(args.amount())?,
            destination: parse(args.to().as_str())?,
            response_destination: from,
            forward_ton_amount: JETTON_FORWARD_TON,
            forward_payload: memo_body(args.memo())?,
        };
        let message = internal_message(
            &parse(token_wallet)?,
            true,
            JETTON_TRANSFER_TON,
            Some(transfer.body()?),
        )?;
        self.finish(from, ton, message)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::input::ChainInput;
    use xchain_core::asset::{AssetConfig, NativeAsset, TokenAssetConfig};
    use xchain_core::types::Address;

    const FROM: &str = "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c";
    const TO: &str = "UQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAJKZ";

    fn input(token_wallet: Option<&str>) -> TxInput {
        TxInput::new(ChainInput::Ton(TonInput {
            seqno: 4,
            valid_until: 1_700_000_060,
            token_wallet: token_wallet.map(str::to_string),
            query_id: 9,
        }))
    }

    fn builder() -> TonTxBuilder {
        TonTxBuilder::new(&ChainConfig::new(NativeAsset::Ton)).unwrap()
    }

    #[test]
    fn test_native_transfer() {
        let args = TransferArgs::new(Address::new(FROM), Address::new(TO), U256::from(1_000u64))
            .with_memo("hi");
        let tx = builder().new_transfer(&args, &input(None)).unwrap();
        assert_eq!(tx.sighashes().unwrap()[0].as_bytes().len(), 32);
        assert!(tx.hash().is_empty());
        assert!(!tx.serialize().unwrap().is_empty());
    }

    #[test]
    fn test_memo_changes_body() {
        let plain = TransferArgs::new(Address::new(FROM), Address::new(TO), U256::from(1u64));
        let memo = plain.clone().with_memo("hi");
        let a = builder().new_transfer(&plain, &input(None)).unwrap();
        let b = builder().new_transfer(&memo, &input(None)).unwrap();
        assert_ne!(a.sighashes().unwrap(), b.sighashes().unwrap());
    }

    #[test]
    fn test_jetton_requires_token_wallet() {
        let token = TokenAssetConfig::new("USDT", FROM, 6);
        let args = TransferArgs::new(Address::new(FROM), Address::new(TO), U256::from(5u64))
            .with_asset(AssetConfig::Token(token));
        let err = builder().new_transfer(&args, &input(None)).unwrap_err();
        assert!(err.to_string().contains("token_wallet"));

        let tx = builder().new_transfer(&args, &input(Some(TO))).unwrap();
        assert_eq!(tx.sighashes().unwrap().len(), 1);
    }

    #[test]
    fn test_bad_address() {
        let args = TransferArgs::new(Address::new(FROM), Address::new("nope"), U256::from(1u64));
        assert!(matches!(
            builder().new_transfer(&args, &input(None)),
            Err(BuildError::Address(_))
        ));
    }

    #[test]
    fn test_wrong_input_family() {
        let args = TransferArgs::new(Address::new(FROM), Address::new(TO), U256::from(1u64));
        let input = TxInput::new(ChainInput::Solana(crate::solana::SolanaInput::default()));
        assert!(builder().new_transfer(&args, &input).is_err());
    }
}
