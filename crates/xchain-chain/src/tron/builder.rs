//! Tron transaction builder: TRX transfers and TRC-20 `transfer` calls.

use std::sync::Arc;

use alloy_primitives::Address as EvmAddress;
use serde::{Deserialize, Serialize};
use xchain_core::config::ChainConfig;
use xchain_core::error::BuildError;
use xchain_core::types::TransferArgs;
use xchain_core::variant::Operation;

use super::address::decode_address;
use super::proto::{Contract, ContractType, Raw, TransferContract, TriggerSmartContract};
use super::tx::TronTx;
use crate::builder::{amount_u64, check_input_kind, require_token, Tx, TxBuilder};
use crate::evm::erc20_transfer_data;
use crate::input::TxInput;

/// Reference block and timing state fetched before building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronInput {
    /// Height of the reference block.
    pub ref_block_num: u64,
    /// Block id of the reference block, hex (32 bytes).
    pub ref_block_id: String,
    /// Creation time, unix milliseconds.
    pub timestamp: i64,
    /// Expiration time, unix milliseconds.
    pub expiration: i64,
    /// Energy fee limit in sun for contract calls.
    #[serde(default)]
    pub fee_limit: i64,
}

/// Transaction builder for tron.
#[derive(Debug, Clone)]
pub struct TronTxBuilder {
    config: Arc<ChainConfig>,
}

fn to_i64(value: u64, field: &str) -> Result<i64, BuildError> {
    i64::try_from(value).map_err(|_| BuildError::invalid_input(format!("{field} exceeds i64")))
}

impl TronTxBuilder {
    /// Builder for `config`.
    #[must_use]
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            config: Arc::new(config.clone()),
        }
    }

    fn raw(input: &TronInput, contract: Contract, memo: Option<&str>) -> Result<Raw, BuildError> {
        let block_id = hex::decode(input.ref_block_id.trim_start_matches("0x"))
            .map_err(|e| BuildError::invalid_input(format!("ref_block_id: {e}")))?;
        let ref_block_hash = block_id
            .get(8..16)
            .ok_or_else(|| BuildError::invalid_input("ref_block_id must be 32 bytes"))?
            .to_vec();
        Ok(Raw {
            ref_block_bytes: input.ref_block_num.to_be_bytes()[6..8].to_vec(),
            ref_block_hash,
            expiration: input.expiration,
            data: memo.map(|m| m.as_bytes().to_vec()).unwrap_or_default(),
            contract: vec![contract],
            timestamp: input.timestamp,
            fee_limit: 0,
        })
    }

    fn finish(&self, raw: Raw) -> Box<dyn Tx> {
        let tx = TronTx::new(raw);
        tracing::debug!(chain = self.config.id(), txid = %tx.hash(), "built tron transaction");
        Box::new(tx)
    }
}

impl TxBuilder for TronTxBuilder {
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let tron = input.as_tron()?;
        let transfer = TransferContract {
            owner_address: decode_address(args.from().as_str())?.to_vec(),
            to_address: decode_address(args.to().as_str())?.to_vec(),
            amount: to_i64(amount_u64(args.amount())?, "amount")?,
        };
        let contract = Contract::new(ContractType::TransferContract, &transfer);
        Ok(self.finish(Self::raw(tron, contract, args.memo())?))
    }

    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let tron = input.as_tron()?;
        let token = require_token(args)?;
        if tron.fee_limit <= 0 {
            return Err(BuildError::invalid_input("fee_limit must be set for TRC-20 transfers"));
        }

        let to = decode_address(args.to().as_str())?;
        let recipient = EvmAddress::from_slice(&to[1..]);
        let call = TriggerSmartContract {
            owner_address: decode_address(args.from().as_str())?.to_vec(),
            contract_address: decode_address(&token.contract)?.to_vec(),
            call_value: 0,
            data: erc20_transfer_data(recipient, args.amount()).to_vec(),
        };
        let contract = Contract::new(ContractType::TriggerSmartContract, &call);
        let mut raw = Self::raw(tron, contract, args.memo())?;
        raw.fee_limit = tron.fee_limit;
        Ok(self.finish(raw))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::input::ChainInput;
    use crate::tron::address::encode_account;
    use crate::tron::proto::Any;
    use prost::Message as _;
    use xchain_core::asset::{AssetConfig, NativeAsset, TokenAssetConfig};
    use xchain_core::types::Address;
    use xchain_core::U256;

    const FROM: &str = "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC";

    fn input(fee_limit: i64) -> TxInput {
        TxInput::new(ChainInput::Tron(TronInput {
            ref_block_num: 0x0102_0304,
            ref_block_id: format!("{}{}", "00".repeat(8), "ab".repeat(24)),
            timestamp: 1_700_000_000_000,
            expiration: 1_700_000_060_000,
            fee_limit,
        }))
    }

    fn builder() -> TronTxBuilder {
        TronTxBuilder::new(&ChainConfig::new(NativeAsset::Trx))
    }

    fn parameter(tx: &dyn Tx) -> (Raw, Any) {
        let decoded =
            super::super::proto::Transaction::decode(tx.serialize().unwrap().as_slice()).unwrap();
        let raw = decoded.raw_data.unwrap();
        let any = raw.contract[0].parameter.clone().unwrap();
        (raw, any)
    }

    #[test]
    fn test_native_transfer() {
        let to = encode_account(&[9u8; 20]);
        let args = TransferArgs::new(Address::new(FROM), Address::new(to), U256::from(1_000_000u64));
        let tx = builder().new_transfer(&args, &input(0)).unwrap();

        let (raw, any) = parameter(tx.as_ref());
        assert_eq!(raw.ref_block_bytes, vec![0x03, 0x04]);
        assert_eq!(raw.ref_block_hash, vec![0xab; 8]);
        assert_eq!(any.type_url, "type.googleapis.com/protocol.TransferContract");

        let transfer = TransferContract::decode(any.value.as_slice()).unwrap();
        assert_eq!(transfer.amount, 1_000_000);
        assert_eq!(transfer.to_address[0], 0x41);
        assert_eq!(tx.hash().as_str().len(), 64);
    }

    #[test]
    fn test_trc20_transfer() {
        let to = encode_account(&[9u8; 20]);
        let token = TokenAssetConfig::new("USDT", "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", 6);
        let args = TransferArgs::new(Address::new(FROM), Address::new(to), U256::from(5u64))
            .with_asset(AssetConfig::Token(token));
        let tx = builder().new_transfer(&args, &input(10_000_000)).unwrap();

        let (raw, any) = parameter(tx.as_ref());
        assert_eq!(raw.fee_limit, 10_000_000);
        let call = TriggerSmartContract::decode(any.value.as_slice()).unwrap();
        assert_eq!(&call.data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&call.data[16..36], &[9u8; 20]);
    }

    #[test]
    fn test_trc20_requires_fee_limit() {
        let to = encode_account(&[9u8; 20]);
        let token = TokenAssetConfig::new("USDT", "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", 6);
        let args = TransferArgs::new(Address::new(FROM), Address::new(to), U256::from(5u64))
            .with_asset(AssetConfig::Token(token));
        assert!(matches!(
            builder().new_transfer(&args, &input(0)),
            Err(BuildError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_short_block_id() {
        let mut short = input(0);
        if let ChainInput::Tron(tron) = &mut short.chain {
            tron.ref_block_id = "abcd".to_string();
        }
        let to = encode_account(&[9u8; 20]);
        let args = TransferArgs::new(Address::new(FROM), Address::new(to), U256::from(1u64));
        assert!(builder().new_transfer(&args, &short).is_err());
    }
}
