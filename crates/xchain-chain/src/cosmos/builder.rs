//! Cosmos SDK transaction builder.
//!
//! Native transfers and IBC/bank tokens are `MsgSend`; staking tasks map to
//! delegate, undelegate and reward withdrawal against the task's
//! `validator_address`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use xchain_core::config::ChainConfig;
use xchain_core::error::{BuildError, ConfigError};
use xchain_core::protocol::PublicKeyFormat;
use xchain_core::types::TransferArgs;
use xchain_core::variant::Operation;

use super::address::CosmosAddressBuilder;
use super::tx::{AminoMsg, Coin, CosmosTx, SignHashing, StdFee, StdSignDoc};
use crate::address::{extract_public_key, AddressBuilder};
use crate::builder::{
    check_input_kind, dispatch_task, require_task, require_token, task_param, TaskRoute, Tx,
    TxBuilder,
};
use crate::input::TxInput;

/// Task code prefixes understood by cosmos chains.
pub const COSMOS_TASK_ROUTES: &[TaskRoute] = &[
    TaskRoute::new("CosmosDelegateOperator", Operation::Staking),
    TaskRoute::new("CosmosUndelegateOperator", Operation::Unstaking),
    TaskRoute::new("CosmosWithdrawRewardsOperator", Operation::Withdrawing),
];

const VALIDATOR_ADDRESS: &str = "validator_address";

/// Sender account state fetched before building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosInput {
    /// On-chain account number.
    pub account_number: u64,
    /// Account sequence.
    pub sequence: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas price in the fee denomination, decimal, e.g. `0.025`.
    pub gas_price: String,
    /// Sender compressed public key, hex.
    pub from_public_key: String,
    /// Memo used when the transfer carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Transaction builder for cosmos and evmos chains.
#[derive(Debug, Clone)]
pub struct CosmosTxBuilder {
    config: Arc<ChainConfig>,
    addresses: CosmosAddressBuilder,
    hashing: SignHashing,
}

impl CosmosTxBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain has no bech32
    /// prefix, chain id or fee denomination.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        let addresses = CosmosAddressBuilder::new(config)?;
        if config.chain_id.is_empty() {
            return Err(ConfigError::invalid_value(
                "chain_id",
                format!("{} requires a chain id", config.id()),
            ));
        }
        if config.chain_coin.is_empty() {
            return Err(ConfigError::invalid_value(
                "chain_coin",
                format!("{} requires a fee denomination", config.id()),
            ));
        }
        let hashing = if config.protocol == xchain_core::Protocol::EVMOS {
            SignHashing::Keccak256
        } else {
            SignHashing::Sha256
        };
        Ok(Self {
            config: Arc::new(config.clone()),
            addresses,
            hashing,
        })
    }

    fn build(
        &self,
        args: &TransferArgs,
        input: &TxInput,
        msg: AminoMsg,
    ) -> Result<Box<dyn Tx>, BuildError> {
        let cosmos = input.as_cosmos()?;
        let public_key = self.sender_key(cosmos, args)?;
        let fee = fee_amount(cosmos.gas_limit, &cosmos.gas_price)?;

        let memo = args
            .memo()
            .map(str::to_string)
            .or_else(|| cosmos.memo.clone())
            .unwrap_or_default();

        let sign_doc = StdSignDoc {
            account_number: cosmos.account_number.to_string(),
            chain_id: self.config.chain_id.clone(),
            fee: StdFee {
                amount: vec![Coin::new(fee, &self.config.chain_coin)],
                gas: cosmos.gas_limit.to_string(),
            },
            memo,
            msgs: vec![msg],
            sequence: cosmos.sequence.to_string(),
        };
        tracing::debug!(
            chain = self.config.id(),
            sequence = cosmos.sequence,
            fee,
            "built cosmos transaction"
        );
        Ok(Box::new(CosmosTx::new(sign_doc, self.hashing, public_key)))
    }

    fn sender_key(&self, input: &CosmosInput, args: &TransferArgs) -> Result<Vec<u8>, BuildError> {
        let raw = hex::decode(input.from_public_key.trim_start_matches("0x"))
            .map_err(|e| BuildError::invalid_input(format!("from_public_key: {e}")))?;
        let key = extract_public_key(PublicKeyFormat::Compressed, &raw)?;
        let derived = self.addresses.address_from_public_key(&key)?;
        if &derived == args.from() {
            Ok(key)
        } else {
            Err(BuildError::invalid_input(
                "from_public_key does not match the sender address",
            ))
        }
    }

    fn send(&self, args: &TransferArgs, denom: &str) -> Result<AminoMsg, BuildError> {
        super::address::decode_address(args.to().as_str(), self.addresses.prefix())?;
        Ok(AminoMsg::Send {
            amount: vec![Coin::new(args.amount(), denom)],
            from_address: args.from().to_string(),
            to_address: args.to().to_string(),
        })
    }
}

/// `ceil(gas_limit * gas_price)` for a decimal gas price.
fn fee_amount(gas_limit: u64, gas_price: &str) -> Result<u128, BuildError> {
    let invalid = || BuildError::invalid_input(format!("invalid gas price {gas_price:?}"));
    let (whole, fraction) = gas_price.split_once('.').unwrap_or((gas_price, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > 18 || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let scale = 10u128.pow(u32::try_from(fraction.len()).map_err(|_| invalid())?);
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let fraction: u128 = if fraction.is_empty() { 0 } else { fraction.parse().map_err(|_| invalid())? };

    let scaled_price = whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(invalid)?;
    let scaled_fee = u128::from(gas_limit)
        .checked_mul(scaled_price)
        .ok_or_else(invalid)?;
    Ok(scaled_fee.div_ceil(scale))
}

impl TxBuilder for CosmosTxBuilder {
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let msg = self.send(args, &self.config.chain_coin)?;
        self.build(args, input, msg)
    }

    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let token = require_token(args)?;
        let msg = self.send(args, &token.contract)?;
        self.build(args, input, msg)
    }

    fn new_task(&self, args: &TransferArgs, input: &TxInput) -> Result<Box<dyn Tx>, BuildError> {
        let task = require_task(args)?;
        let operation = dispatch_task(task, COSMOS_TASK_ROUTES)?;
        check_input_kind(input, operation)?;
        let validator = task_param(task, &self.config, VALIDATOR_ADDRESS)?.to_string();
        let delegator = args.from().to_string();
        let amount = Coin::new(args.amount(), &self.config.chain_coin);

        let msg = match operation {
            Operation::Staking => AminoMsg::Delegate {
                amount,
                delegator_address: delegator,
                validator_address: validator,
            },
            Operation::Unstaking => AminoMsg::Undelegate {
                amount,
                delegator_address: delegator,
                validator_address: validator,
            },
            Operation::Withdrawing => AminoMsg::WithdrawReward {
                delegator_address: delegator,
                validator_address: validator,
            },
            Operation::Transfer => {
                return Err(BuildError::invalid_input("transfer is not a task operation"))
            }
        };
        tracing::debug!(task = %task.code, operation = operation.as_str(), "routed cosmos task");
        self.build(args, input, msg)
    }
}
